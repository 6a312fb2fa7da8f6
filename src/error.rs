use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlinkError {
    #[error("failed to encode value for key `{key}`: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to decode value for key `{key}`: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown operation `{0}`")]
    UnknownOperation(String),

    #[error("operation `{op}` expects a {arg}")]
    MissingArgument { op: String, arg: &'static str },
}
