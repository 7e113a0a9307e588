//! IdTag domain entity

use chrono::{DateTime, Utc};

/// IdTag authorization status (OCPP 1.6)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdTagStatus {
    #[default]
    Accepted,
    Blocked,
    Expired,
    Invalid,
    ConcurrentTx,
}

impl IdTagStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "Accepted",
            Self::Blocked => "Blocked",
            Self::Expired => "Expired",
            Self::Invalid => "Invalid",
            Self::ConcurrentTx => "ConcurrentTx",
        }
    }
}

impl std::fmt::Display for IdTagStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for IdTagStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "accepted" => Ok(Self::Accepted),
            "blocked" => Ok(Self::Blocked),
            "expired" => Ok(Self::Expired),
            "invalid" => Ok(Self::Invalid),
            "concurrenttx" => Ok(Self::ConcurrentTx),
            other => Err(format!("unknown id tag status: {other}")),
        }
    }
}

/// Authorization token registered with the central system
#[derive(Debug, Clone, PartialEq)]
pub struct OcppTag {
    /// The ID tag value (RFID card number)
    pub id_tag: String,
    /// Stored status; anything other than Accepted is reported verbatim
    pub status: IdTagStatus,
    /// Parent ID tag (for group authorization)
    pub parent_id_tag: Option<String>,
    pub expiry_date: Option<DateTime<Utc>>,
    /// True while an open transaction references this tag
    pub in_transaction: bool,
    pub note: Option<String>,
}

impl OcppTag {
    pub fn new(id_tag: impl Into<String>) -> Self {
        Self {
            id_tag: id_tag.into(),
            status: IdTagStatus::Accepted,
            parent_id_tag: None,
            expiry_date: None,
            in_transaction: false,
            note: None,
        }
    }

    pub fn with_status(mut self, status: IdTagStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_expiry(mut self, expiry_date: DateTime<Utc>) -> Self {
        self.expiry_date = Some(expiry_date);
        self
    }

    pub fn with_parent(mut self, parent_id_tag: impl Into<String>) -> Self {
        self.parent_id_tag = Some(parent_id_tag.into());
        self
    }

    /// Authorization status at `now`, ignoring the double-use flag
    pub fn auth_status(&self, now: DateTime<Utc>) -> IdTagStatus {
        if self.status != IdTagStatus::Accepted {
            return self.status;
        }
        match self.expiry_date {
            Some(expiry) if expiry < now => IdTagStatus::Expired,
            _ => IdTagStatus::Accepted,
        }
    }
}

/// Result of authorizing an id tag; becomes an OCPP `IdTagInfo`
#[derive(Debug, Clone, PartialEq)]
pub struct Authorization {
    pub status: IdTagStatus,
    pub expiry_date: Option<DateTime<Utc>>,
    pub parent_id_tag: Option<String>,
}

impl Authorization {
    /// Authorization of a tag that may not exist
    pub fn for_tag(tag: Option<&OcppTag>, now: DateTime<Utc>) -> Self {
        match tag {
            Some(tag) => Self {
                status: tag.auth_status(now),
                expiry_date: tag.expiry_date,
                parent_id_tag: tag.parent_id_tag.clone(),
            },
            None => Self::invalid(),
        }
    }

    pub fn invalid() -> Self {
        Self {
            status: IdTagStatus::Invalid,
            expiry_date: None,
            parent_id_tag: None,
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.status == IdTagStatus::Accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn unknown_tag_is_invalid() {
        let auth = Authorization::for_tag(None, Utc::now());
        assert_eq!(auth.status, IdTagStatus::Invalid);
        assert!(auth.expiry_date.is_none());
    }

    #[test]
    fn stored_non_accepted_status_is_mirrored() {
        let now = Utc::now();
        for status in [IdTagStatus::Blocked, IdTagStatus::Expired, IdTagStatus::Invalid] {
            let tag = OcppTag::new("TAG").with_status(status);
            assert_eq!(tag.auth_status(now), status);
        }
    }

    #[test]
    fn past_expiry_reports_expired() {
        let now = Utc::now();
        let tag = OcppTag::new("TAG").with_expiry(now - Duration::minutes(1));
        assert_eq!(tag.auth_status(now), IdTagStatus::Expired);

        let tag = OcppTag::new("TAG").with_expiry(now + Duration::minutes(1));
        assert_eq!(tag.auth_status(now), IdTagStatus::Accepted);
    }

    #[test]
    fn in_transaction_does_not_affect_status() {
        let mut tag = OcppTag::new("TAG").with_parent("GROUP");
        tag.in_transaction = true;
        let auth = Authorization::for_tag(Some(&tag), Utc::now());
        assert!(auth.is_accepted());
        assert_eq!(auth.parent_id_tag.as_deref(), Some("GROUP"));
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("blocked".parse::<IdTagStatus>().unwrap(), IdTagStatus::Blocked);
        assert_eq!("ConcurrentTx".parse::<IdTagStatus>().unwrap(), IdTagStatus::ConcurrentTx);
        assert!("nope".parse::<IdTagStatus>().is_err());
    }
}
