//! Template registry: a process-wide immutable map from template id to its
//! state-machine implementation. Populated at startup; there is no dynamic
//! registration path.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::chess::Chess;
use crate::domain::rps::RockPaperScissors;
use crate::domain::template::Template;
use crate::errors::{DomainError, NotFoundKind};

pub struct TemplateRegistry {
    templates: HashMap<&'static str, Arc<dyn Template>>,
}

impl TemplateRegistry {
    /// Registry with the built-in templates.
    pub fn builtin() -> Self {
        let mut templates: HashMap<&'static str, Arc<dyn Template>> = HashMap::new();
        for template in [
            Arc::new(RockPaperScissors) as Arc<dyn Template>,
            Arc::new(Chess) as Arc<dyn Template>,
        ] {
            templates.insert(template.template_id(), template);
        }
        Self { templates }
    }

    pub fn get(&self, template_id: &str) -> Result<Arc<dyn Template>, DomainError> {
        self.templates.get(template_id).cloned().ok_or_else(|| {
            DomainError::not_found(
                NotFoundKind::Template,
                format!("unknown template: {template_id}"),
            )
        })
    }

    pub fn template_ids(&self) -> Vec<&'static str> {
        let mut ids: Vec<&'static str> = self.templates.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}
