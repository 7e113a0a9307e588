pub mod dispatcher;

pub use dispatcher::MessageDispatcher;
