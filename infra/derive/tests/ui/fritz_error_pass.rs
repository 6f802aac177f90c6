use fritz_derive::fritz_error;
use std::borrow::Cow;

#[fritz_error]
pub enum ComposeError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Template missing{}: {path}", format_context(.context))]
    MissingTemplate { path: String, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn main() {
    let err: ComposeError = "boom".into();
    assert!(err.context_str().is_none());
}
