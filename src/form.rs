use crate::{
    error::{GenerationError, Result},
    models::{AspectCategory, GenerationRequest, StyleCategory},
};

/// Holds the user-entered parameters and gates submission.
#[derive(Debug, Clone, Default)]
pub struct FormController {
    prompt: String,
    aspect: AspectCategory,
    style: StyleCategory,
    disabled: bool,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_aspect(mut self, aspect: AspectCategory) -> Self {
        self.aspect = aspect;
        self
    }

    pub fn with_style(mut self, style: StyleCategory) -> Self {
        self.style = style;
        self
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) -> Result<()> {
        self.ensure_enabled()?;
        self.prompt = prompt.into();
        Ok(())
    }

    pub fn set_aspect(&mut self, aspect: AspectCategory) -> Result<()> {
        self.ensure_enabled()?;
        self.aspect = aspect;
        Ok(())
    }

    pub fn set_style(&mut self, style: StyleCategory) -> Result<()> {
        self.ensure_enabled()?;
        self.style = style;
        Ok(())
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn aspect(&self) -> AspectCategory {
        self.aspect
    }

    pub fn style(&self) -> StyleCategory {
        self.style
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Validate and lock the inputs. Nothing is sent when this fails.
    pub fn begin_submission(&mut self) -> Result<GenerationRequest> {
        self.ensure_enabled()?;
        let request = GenerationRequest::new(self.prompt.clone(), self.aspect, self.style)?;
        self.disabled = true;
        Ok(request)
    }

    pub fn end_submission(&mut self) {
        self.disabled = false;
    }

    fn ensure_enabled(&self) -> Result<()> {
        if self.disabled {
            Err(GenerationError::Busy)
        } else {
            Ok(())
        }
    }
}
