/// Client input for posts and comments.
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PostForm {
    #[validate(custom(function = "not_blank", message = "Post text is required"))]
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub group: Option<i64>,
    #[validate(length(max = 255, message = "Image path is too long"))]
    #[serde(default)]
    pub image: Option<String>,
}

/// Post fields after validation; this is what the store writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub text: String,
    pub group_id: Option<i64>,
    pub image: Option<String>,
}

impl PostForm {
    pub fn to_draft(&self) -> Result<PostDraft, ValidationErrors> {
        self.validate()?;

        Ok(PostDraft {
            text: self.text.trim().to_string(),
            group_id: self.group,
            image: self
                .image
                .as_deref()
                .map(str::trim)
                .filter(|path| !path.is_empty())
                .map(str::to_string),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CommentForm {
    #[validate(custom(function = "not_blank", message = "Comment text is required"))]
    #[serde(default)]
    pub text: String,
}

impl CommentForm {
    pub fn cleaned_text(&self) -> Result<String, ValidationErrors> {
        self.validate()?;
        Ok(self.text.trim().to_string())
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Flattens validator output into `field: message` lines for the form context.
pub fn describe_errors(errors: &ValidationErrors) -> Vec<String> {
    let mut lines: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |err| {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                format!("{}: {}", field, message)
            })
        })
        .collect();
    lines.sort();
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_rejected() {
        let form = PostForm {
            text: "   ".into(),
            ..Default::default()
        };
        let errors = form.to_draft().unwrap_err();
        assert_eq!(describe_errors(&errors), vec!["text: Post text is required"]);
    }

    #[test]
    fn draft_trims_text_and_drops_empty_image() {
        let form = PostForm {
            text: "  hello  ".into(),
            group: Some(3),
            image: Some(" ".into()),
        };
        let draft = form.to_draft().unwrap();
        assert_eq!(draft.text, "hello");
        assert_eq!(draft.group_id, Some(3));
        assert_eq!(draft.image, None);
    }

    #[test]
    fn comment_requires_text() {
        assert!(CommentForm::default().cleaned_text().is_err());
        let form = CommentForm {
            text: " hello ".into(),
        };
        assert_eq!(form.cleaned_text().unwrap(), "hello");
    }
}
