use crate::css::parse_rule_sets;
use crate::error::PaintError;
use crate::host::{Host, Target};
use crate::specificity::{Specificity, split_selector_list};
use crate::types::StyleDeclaration;
use log::debug;
use std::rc::Rc;

/// One selector of a selector list. Rules split from the same list share
/// their declaration.
#[derive(Debug, Clone)]
pub struct Rule {
    selector: String,
    specificity: Specificity,
    declaration: Rc<StyleDeclaration>,
}

impl Rule {
    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn specificity(&self) -> Specificity {
        self.specificity
    }

    pub fn declaration(&self) -> &StyleDeclaration {
        &self.declaration
    }
}

#[derive(Debug, Clone, Default)]
pub struct Stylesheet {
    // Selector list -> declaration, in first-registration order.
    rule_sheet: Vec<(String, Rc<StyleDeclaration>)>,
    rules: Vec<Rule>,
}

impl Stylesheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rules<S, I>(rule_set: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, StyleDeclaration)>,
    {
        let mut sheet = Stylesheet::new();
        sheet.add(rule_set);
        sheet
    }

    pub fn parse(css: &str) -> Result<Self, PaintError> {
        let mut sheet = Stylesheet::new();
        sheet.add_css(css)?;
        Ok(sheet)
    }

    /// Merges selector lists into the rule table. A selector list that is
    /// already present has its declaration replaced in place.
    pub fn add<S, I>(&mut self, rule_set: I)
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, StyleDeclaration)>,
    {
        for (selector_list, declaration) in rule_set {
            let selector_list: String = selector_list.into();
            debug!("stylesheet rule `{selector_list}` = {declaration}");
            let declaration = Rc::new(declaration);
            match self
                .rule_sheet
                .iter_mut()
                .find(|(existing, _)| *existing == selector_list)
            {
                Some((_, slot)) => *slot = declaration,
                None => self.rule_sheet.push((selector_list, declaration)),
            }
        }
        self.rebuild();
    }

    pub fn add_rule(&mut self, selector_list: impl Into<String>, declaration: StyleDeclaration) {
        let selector_list: String = selector_list.into();
        self.add([(selector_list, declaration)]);
    }

    pub fn add_css(&mut self, css: &str) -> Result<(), PaintError> {
        let rule_sets = parse_rule_sets(css)?;
        self.add(rule_sets);
        Ok(())
    }

    fn rebuild(&mut self) {
        self.rules.clear();
        for (selector_list, declaration) in &self.rule_sheet {
            for selector in split_selector_list(selector_list) {
                self.rules.push(Rule {
                    specificity: Specificity::of(&selector),
                    selector,
                    declaration: Rc::clone(declaration),
                });
            }
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Declarations of every rule matching `target`, lowest specificity first,
    /// so folding left to right lets the strongest rule win. Equal
    /// specificities keep registration order. The window matches nothing.
    pub fn matching_styles<H: Host>(
        &self,
        host: &H,
        target: &Target<H::Node>,
    ) -> Vec<Rc<StyleDeclaration>> {
        let Target::Element(node) = target else {
            return Vec::new();
        };
        let mut matches: Vec<&Rule> = self
            .rules
            .iter()
            .filter(|rule| host.matches(node, &rule.selector))
            .collect();
        matches.sort_by_key(|rule| rule.specificity);
        matches
            .into_iter()
            .map(|rule| Rc::clone(&rule.declaration))
            .collect()
    }
}
