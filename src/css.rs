use crate::error::PaintError;
use crate::types::{Property, StyleDeclaration, StyleValue};
use lightningcss::declaration::DeclarationBlock;
use lightningcss::rules::{CssRule, CssRuleList};
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleAttribute, StyleSheet};
use lightningcss::traits::ToCss;
use log::debug;

impl StyleDeclaration {
    /// Parses a declaration block such as `width: 100px; x: auto`.
    pub fn parse(block: &str) -> Result<StyleDeclaration, PaintError> {
        let attribute = StyleAttribute::parse(block, ParserOptions::default())
            .map_err(|err| PaintError::InvalidDeclaration(err.to_string()))?;
        Ok(declaration_from_block(&attribute.declarations))
    }
}

/// Parses CSS text into `(selector list, declaration)` pairs in source order.
/// Media and other at-rules are not evaluated.
pub(crate) fn parse_rule_sets(css: &str) -> Result<Vec<(String, StyleDeclaration)>, PaintError> {
    let sheet = StyleSheet::parse(css, ParserOptions::default())
        .map_err(|err| PaintError::InvalidStylesheet(err.to_string()))?;
    let mut rule_sets = Vec::new();
    collect_rule_sets(&sheet.rules, &mut rule_sets)?;
    Ok(rule_sets)
}

fn collect_rule_sets(
    rules: &CssRuleList,
    out: &mut Vec<(String, StyleDeclaration)>,
) -> Result<(), PaintError> {
    for rule in &rules.0 {
        match rule {
            CssRule::Style(style) => {
                let selectors = style
                    .selectors
                    .to_css_string(PrinterOptions::default())
                    .map_err(|err| PaintError::InvalidStylesheet(err.to_string()))?;
                let declaration = declaration_from_block(&style.declarations);
                if declaration.is_empty() {
                    debug!("css rule `{selectors}` carries no geometry; skipped");
                    continue;
                }
                out.push((selectors, declaration));
            }
            _ => debug!("unsupported css rule skipped"),
        }
    }
    Ok(())
}

fn declaration_from_block(block: &DeclarationBlock) -> StyleDeclaration {
    let mut declaration = StyleDeclaration::new();
    for property in block
        .declarations
        .iter()
        .chain(block.important_declarations.iter())
    {
        let id = property.property_id();
        let name = id.name();
        let Some(target) = Property::from_name(name) else {
            debug!("css property `{name}` has no geometry meaning; ignored");
            continue;
        };
        let raw = property
            .value_to_css_string(PrinterOptions::default())
            .unwrap_or_default();
        declaration.set(target, StyleValue::parse(&raw));
    }
    declaration
}
