use std::fmt::Display;

use log::{debug, error, info};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{config::User, http::HttpGet, utils::single_line, QueryError};

const APPLY_WIN_QUERY_PATH: &str = "/service/apply-win-query";
const CITY_NO: &str = "sz";

/// Response from ISZCloud for one user's reservation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(deserialize_with = "null_as_default")]
    pub data: ApplyInfo,
    #[serde(deserialize_with = "null_as_default")]
    pub success: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApplyInfo {
    #[serde(deserialize_with = "null_as_default")]
    pub city_no: String,
    #[serde(deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub mobile: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub apply_time: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub win_time: String,
    #[serde(deserialize_with = "null_as_default")]
    pub expire_time: String,
    #[serde(deserialize_with = "null_as_default")]
    pub send_no: String,
}

/// The service sends `null` for values it has not filled in yet
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl StatusRecord {
    /// True if the query succeeded and the status says the user was picked
    pub fn is_won(&self) -> bool {
        self.success && (self.data.status.contains("PAYED") || self.data.status.contains("SUCC"))
    }
}

impl TryFrom<&[u8]> for StatusRecord {
    type Error = QueryError;

    fn try_from(body: &[u8]) -> Result<Self, Self::Error> {
        Ok(serde_json::from_slice(body)?)
    }
}

impl Display for StatusRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let d = &self.data;
        if self.is_won() {
            write!(
                f,
                "\n[中奖通知]恭喜你抽中奖了\n {} {} {} {}\n",
                d.name, d.mobile, d.status, d.send_no
            )
        } else {
            write!(
                f,
                "\n[再接再厉] {} {} {} {}\n",
                d.name, d.mobile, d.address, d.status
            )
        }
    }
}

/// Records collected during one run, in the order users were configured
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusReport(Vec<StatusRecord>);

impl StatusReport {
    pub fn records(&self) -> &[StatusRecord] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for StatusReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, record) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{record}")?;
        }
        write!(f, "]")
    }
}

pub fn query_url(server: &str, user: &User) -> String {
    format!(
        "{server}{APPLY_WIN_QUERY_PATH}/{}/{}?cityNo={CITY_NO}",
        user.mobile, user.code
    )
}

pub fn query_user(
    server: &str,
    user: &User,
    http: &dyn HttpGet,
) -> Result<StatusRecord, QueryError> {
    let url = query_url(server, user);
    let body = http.get(&url)?;
    debug!("Received {} bytes for {}", body.len(), user.mobile);
    StatusRecord::try_from(body.as_slice())
}

/// Queries every user in turn. Users that fail are logged and left out of the
/// report, this never fails as a whole.
pub fn query_all(server: &str, users: &[User], http: &dyn HttpGet) -> StatusReport {
    let mut result = Vec::with_capacity(users.len());
    for user in users {
        match query_user(server, user, http) {
            Ok(record) => {
                info!("ISZCloud: {}", single_line(&record.to_string()));
                result.push(record);
            }
            Err(e) => {
                error!("Query for {} skipped: {e:?}", user.mobile);
            }
        }
    }
    debug_assert!(result.len() <= users.len());
    StatusReport(result)
}
