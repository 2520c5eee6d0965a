//! Editor construction errors.

use thiserror::Error;

use crate::config::ConfigError;
use crate::container::AttachError;
use crate::renderer::RendererError;

/// Why an editor could not be opened.
///
/// Every variant is a hard failure: the host should see an error instead of
/// a blank editor window. Problems with individual messages from the web
/// content are never reported here.
#[derive(Debug, Error)]
pub enum EditorError {
    /// Size or asset location is invalid.
    #[error("invalid editor configuration: {0}")]
    Config(#[from] ConfigError),

    /// The renderer could not be created or could not load the entry document.
    #[error("web renderer failed: {0}")]
    Renderer(#[from] RendererError),

    /// The renderer's surface could not be embedded in the editor window.
    #[error("failed to embed web renderer: {0}")]
    Attach(#[from] AttachError),

    /// The renderer came up without a native surface to embed.
    #[error("web renderer did not provide a native surface")]
    MissingNativeHandle,

    /// The editor's host window could not be opened.
    #[error("editor window failed: {0}")]
    Window(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn renderer_error_display_chains() {
        let err = EditorError::from(RendererError::Unavailable("no WebView2 runtime".into()));
        assert_eq!(
            err.to_string(),
            "web renderer failed: web renderer unavailable: no WebView2 runtime"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn attach_error_converts() {
        let err = EditorError::from(AttachError::NullHandle);
        assert!(matches!(err, EditorError::Attach(AttachError::NullHandle)));
    }

    #[test]
    fn missing_handle_has_no_source() {
        assert!(EditorError::MissingNativeHandle.source().is_none());
    }
}
