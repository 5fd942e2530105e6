use serde_json::{Map, Value};

use super::domain::CandidateId;
use super::validation::{is_truthy, FieldCategory, ValidationError};

pub const ID_KEY: &str = "id";

/// A candidate payload classified by intent.
///
/// A truthy `id` marks an edit from a trusted caller; everything else is a new profile that
/// has to pass field validation before it is stored.
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateRequest {
    Create(Map<String, Value>),
    Update {
        id: CandidateId,
        fields: Map<String, Value>,
    },
}

/// A payload that could not be turned into a [`CandidateRequest`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// The payload is not a JSON object.
    #[error(transparent)]
    Malformed(#[from] ValidationError),
    /// The payload is an edit, but its `id` cannot address a stored row.
    #[error("candidate identifier {raw} is not a valid storage key")]
    UnusableIdentifier { raw: String },
}

impl CandidateRequest {
    pub fn from_payload(payload: Value) -> Result<Self, RequestError> {
        let Value::Object(fields) = payload else {
            return Err(ValidationError::with_detail(
                FieldCategory::Payload,
                "expected a JSON object",
            )
            .into());
        };

        match fields.get(ID_KEY).filter(|id| is_truthy(id)) {
            None => Ok(Self::Create(fields)),
            Some(raw) => {
                let id = parse_id(raw).ok_or_else(|| RequestError::UnusableIdentifier {
                    raw: raw.to_string(),
                })?;
                Ok(Self::Update { id, fields })
            }
        }
    }

    pub fn id(&self) -> Option<CandidateId> {
        match self {
            Self::Create(_) => None,
            Self::Update { id, .. } => Some(*id),
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        match self {
            Self::Create(fields) | Self::Update { fields, .. } => fields,
        }
    }

    pub fn is_update(&self) -> bool {
        matches!(self, Self::Update { .. })
    }
}

fn parse_id(raw: &Value) -> Option<CandidateId> {
    let id: Option<u64> = match raw {
        Value::Number(number) => number.as_u64(),
        Value::String(text) if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) => {
            text.parse().ok()
        }
        _ => None,
    };
    id.filter(|id| *id > 0).map(CandidateId)
}
