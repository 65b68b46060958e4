use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error(
        "tokenizer class '{class}' is defined by custom code in the model repository; enable trust_remote_code to use it"
    )]
    RemoteCodeNotTrusted { class: String },

    #[error("unrecognized tokenizer class '{class}'")]
    UnknownClass { class: String },

    #[error("unrecognized model_type '{model_type}'")]
    UnknownModelType { model_type: String },

    #[error("neither tokenizer_class nor model_type is set; cannot identify the tokenizer")]
    Unidentified,
}
