//! `templates` command.

use anyhow::Result;
use serde::Serialize;

use crate::cli::output::{list_table, output, render_list, truncate, CommandOutput};
use crate::domain::models::{builtin_templates, AgentTemplate};

#[derive(Debug, Serialize)]
pub struct TemplateListOutput {
    pub templates: Vec<AgentTemplate>,
    pub total: usize,
}

impl CommandOutput for TemplateListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "name", "category", "description"]);
        for template in &self.templates {
            table.add_row(vec![
                template.id.clone(),
                format!("{} {}", template.icon, template.name),
                template.category.display_name().to_string(),
                truncate(&template.description, 50),
            ]);
        }
        render_list("template", &table, self.total)
    }
}

pub fn execute(json_mode: bool) -> Result<()> {
    let templates = builtin_templates().to_vec();
    let out = TemplateListOutput {
        total: templates.len(),
        templates,
    };
    output(&out, json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_list_output() {
        let templates = builtin_templates().to_vec();
        let out = TemplateListOutput {
            total: templates.len(),
            templates,
        };

        let human = out.to_human();
        assert!(human.contains("customer-support"));
        assert_eq!(out.to_json()["total"], 6);
    }
}
