//! Result renderer
//!
//! Pure projection of the selected reference image and the processing result
//! into comparison panes and validation rows. Missing data suppresses the
//! matching pane; it is never an error.

use crate::model::{ImageAsset, ProcessingResult};

/// The three comparison panes, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneKind {
    OriginalReference,
    AdaptedReference,
    FinalFusedImage,
}

impl PaneKind {
    pub fn all() -> [PaneKind; 3] {
        [
            PaneKind::OriginalReference,
            PaneKind::AdaptedReference,
            PaneKind::FinalFusedImage,
        ]
    }

    pub fn title(&self) -> &'static str {
        match self {
            PaneKind::OriginalReference => "Original reference",
            PaneKind::AdaptedReference => "Adapted reference",
            PaneKind::FinalFusedImage => "Final fused image",
        }
    }
}

/// Where a pane's image comes from
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// The file the user selected, still held in memory
    Local {
        file_name: String,
        mime_type: String,
        size: String,
    },
    /// An artifact produced by the service
    Remote {
        /// Path exactly as returned in the response
        path: String,
        /// `path` resolved against the service base URL
        url: String,
    },
}

impl ImageSource {
    /// The source as the service or the user named it
    pub fn location(&self) -> &str {
        match self {
            ImageSource::Local { file_name, .. } => file_name,
            ImageSource::Remote { path, .. } => path,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pane {
    pub kind: PaneKind,
    pub source: ImageSource,
}

/// One validation check, shown verbatim
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationRow {
    pub name: String,
    pub success: bool,
    pub score: f64,
    pub feedback: String,
}

impl ValidationRow {
    pub fn tag(&self) -> &'static str {
        if self.success {
            "success"
        } else {
            "failure"
        }
    }

    pub fn score_label(&self) -> String {
        self.score.to_string()
    }
}

/// Everything the results panel draws
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultView {
    pub panes: Vec<Pane>,
    /// `None` when the response carried no validation mapping at all
    pub validation: Option<Vec<ValidationRow>>,
    /// Status, message and retry count reported by the service
    pub summary: Vec<(&'static str, String)>,
}

impl ResultView {
    pub fn pane(&self, kind: PaneKind) -> Option<&Pane> {
        self.panes.iter().find(|p| p.kind == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.panes.is_empty() && self.validation.is_none() && self.summary.is_empty()
    }
}

/// Resolve an artifact path against the service base URL.
///
/// Absolute URLs are left alone.
pub fn resolve_artifact(base_url: &str, path: &str) -> String {
    let lower = path.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("data:") {
        return path.to_string();
    }

    let base = base_url.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

fn remote(kind: PaneKind, base_url: &str, path: &str) -> Pane {
    Pane {
        kind,
        source: ImageSource::Remote {
            path: path.to_string(),
            url: resolve_artifact(base_url, path),
        },
    }
}

/// Project the current reference asset and result into a view
pub fn render_result(
    reference: Option<&ImageAsset>,
    result: Option<&ProcessingResult>,
    base_url: &str,
) -> ResultView {
    let Some(result) = result else {
        return ResultView::default();
    };

    let mut panes = Vec::with_capacity(3);

    if let Some(asset) = reference {
        panes.push(Pane {
            kind: PaneKind::OriginalReference,
            source: ImageSource::Local {
                file_name: asset.file_name.clone(),
                mime_type: asset.mime_type.clone(),
                size: asset.size_label(),
            },
        });
    }

    if let Some(path) = result.adapted_reference_path() {
        panes.push(remote(PaneKind::AdaptedReference, base_url, path));
    }

    if let Some(ref path) = result.generated_image_path {
        panes.push(remote(PaneKind::FinalFusedImage, base_url, path));
    }

    let validation = result.validation_results.as_ref().map(|checks| {
        checks
            .iter()
            .map(|(name, outcome)| ValidationRow {
                name: name.clone(),
                success: outcome.success,
                score: outcome.score,
                feedback: outcome.feedback.clone(),
            })
            .collect()
    });

    let mut summary = Vec::new();
    if let Some(ref status) = result.status {
        summary.push(("status", status.clone()));
    }
    if let Some(ref message) = result.message {
        summary.push(("message", message.clone()));
    }
    if let Some(retries) = result.retry_count {
        summary.push(("retries", retries.to_string()));
    }

    ResultView {
        panes,
        validation,
        summary,
    }
}
