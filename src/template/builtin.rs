//! Built-in templates

use super::definition::{
    FormattingFlags, HeadingStyle, SectionRequirement, StructureFlags, TemplateDefinition,
};

fn sections(items: &[(&str, &str, bool)]) -> Vec<SectionRequirement> {
    items
        .iter()
        .map(|(emoji, title, required)| SectionRequirement::new(1, Some(emoji), title, *required))
        .collect()
}

pub fn standard_docs() -> TemplateDefinition {
    TemplateDefinition {
        name: "standard_docs".to_string(),
        display_name: "Standard Documentation".to_string(),
        description: "General purpose documentation template".to_string(),
        structure: StructureFlags {
            frontmatter: true,
            toc: true,
            breadcrumbs: true,
            edit_uri: true,
            search: false,
        },
        sections: sections(&[
            ("🏠", "Home", true),
            ("📚", "About", false),
            ("👥", "Team", false),
            ("⚙️", "Operations", false),
            ("🔧", "Tools", false),
            ("❓", "FAQ", false),
        ]),
        formatting: FormattingFlags {
            emojis: true,
            heading_style: HeadingStyle::Atx,
            code_blocks: true,
            admonitions: true,
            tables: true,
            syntax_highlighting: false,
        },
    }
}

pub fn technical_docs() -> TemplateDefinition {
    TemplateDefinition {
        name: "technical_docs".to_string(),
        display_name: "Technical Documentation".to_string(),
        description: "API and technical reference documentation".to_string(),
        structure: StructureFlags {
            frontmatter: true,
            toc: true,
            breadcrumbs: true,
            edit_uri: true,
            search: true,
        },
        sections: sections(&[
            ("📖", "Overview", true),
            ("🚀", "Getting Started", true),
            ("🔌", "API Reference", false),
            ("💡", "Examples", false),
            ("🔩", "Configuration", false),
            ("🐛", "Troubleshooting", false),
        ]),
        formatting: FormattingFlags {
            emojis: true,
            heading_style: HeadingStyle::Atx,
            code_blocks: true,
            admonitions: true,
            tables: true,
            syntax_highlighting: true,
        },
    }
}

pub fn project_docs() -> TemplateDefinition {
    TemplateDefinition {
        name: "project_docs".to_string(),
        display_name: "Project Documentation".to_string(),
        description: "Project management and process documentation".to_string(),
        structure: StructureFlags {
            frontmatter: true,
            toc: true,
            breadcrumbs: true,
            edit_uri: false,
            search: false,
        },
        sections: sections(&[
            ("🏠", "Home", true),
            ("📚", "About", false),
            ("🎯", "Goals", false),
            ("🔄", "Processes", false),
            ("👥", "Team", false),
            ("📈", "Progress", false),
        ]),
        formatting: FormattingFlags {
            emojis: true,
            heading_style: HeadingStyle::Atx,
            code_blocks: false,
            admonitions: true,
            tables: true,
            syntax_highlighting: false,
        },
    }
}

pub fn minimal() -> TemplateDefinition {
    TemplateDefinition {
        name: "minimal".to_string(),
        display_name: "Minimal Documentation".to_string(),
        description: "Simple, minimal documentation template".to_string(),
        structure: StructureFlags {
            frontmatter: false,
            toc: false,
            breadcrumbs: false,
            edit_uri: false,
            search: false,
        },
        sections: sections(&[("🏠", "Home", true)]),
        formatting: FormattingFlags {
            emojis: true,
            heading_style: HeadingStyle::Atx,
            code_blocks: true,
            admonitions: false,
            tables: true,
            syntax_highlighting: false,
        },
    }
}

/// All built-ins in registration order
pub fn all() -> Vec<TemplateDefinition> {
    vec![standard_docs(), technical_docs(), project_docs(), minimal()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_are_valid() {
        for template in all() {
            assert!(template.check().is_ok(), "{} invalid", template.name);
        }
    }

    #[test]
    fn test_minimal_disables_structure() {
        let minimal = minimal();
        assert!(!minimal.structure.frontmatter);
        assert!(!minimal.structure.toc);
        assert_eq!(minimal.required_sections().count(), 1);
    }

    #[test]
    fn test_technical_requires_two_sections() {
        let technical = technical_docs();
        let titles: Vec<&str> = technical
            .required_sections()
            .map(|s| s.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Overview", "Getting Started"]);
    }
}
