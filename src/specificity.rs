/// Selector weight as `(ids, classes, types)`, compared lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Specificity(pub u16, pub u16, pub u16);

impl Specificity {
    pub const ZERO: Specificity = Specificity(0, 0, 0);

    /// Specificity of a single complex selector (no top-level commas).
    pub fn of(selector: &str) -> Specificity {
        let chars: Vec<char> = selector.trim().chars().collect();
        let mut total = Specificity::ZERO;
        let mut i = 0usize;
        while i < chars.len() {
            let ch = chars[i];
            match ch {
                '#' => {
                    i = skip_ident(&chars, i + 1);
                    total.0 += 1;
                }
                '.' => {
                    i = skip_ident(&chars, i + 1);
                    total.1 += 1;
                }
                '[' => {
                    i = skip_block(&chars, i, '[', ']');
                    total.1 += 1;
                }
                ':' => {
                    let pseudo_element = chars.get(i + 1) == Some(&':');
                    let start = if pseudo_element { i + 2 } else { i + 1 };
                    let end = skip_ident(&chars, start);
                    let name: String = chars[start..end].iter().collect::<String>().to_ascii_lowercase();
                    let (args, next) = if chars.get(end) == Some(&'(') {
                        let close = skip_block(&chars, end, '(', ')');
                        let inner_end = close.saturating_sub(1).max(end + 1);
                        (Some(chars[end + 1..inner_end].iter().collect::<String>()), close)
                    } else {
                        (None, end)
                    };
                    i = next;
                    total = total.add(pseudo_specificity(&name, pseudo_element, args.as_deref()));
                }
                '*' => i += 1,
                '\\' => {
                    i = skip_ident(&chars, i);
                    total.2 += 1;
                }
                _ if is_ident_start(ch) => {
                    let end = skip_ident(&chars, i);
                    // `ns|tag` counts once, for the type after the bar.
                    if chars.get(end) == Some(&'|') {
                        i = end + 1;
                        continue;
                    }
                    i = end;
                    total.2 += 1;
                }
                _ => i += 1,
            }
        }
        total
    }

    fn add(self, other: Specificity) -> Specificity {
        Specificity(
            self.0.saturating_add(other.0),
            self.1.saturating_add(other.1),
            self.2.saturating_add(other.2),
        )
    }
}

fn pseudo_specificity(name: &str, pseudo_element: bool, args: Option<&str>) -> Specificity {
    if pseudo_element {
        return Specificity(0, 0, 1);
    }
    match name {
        "before" | "after" | "first-line" | "first-letter" => Specificity(0, 0, 1),
        "where" => Specificity::ZERO,
        "not" | "is" | "has" | "matches" | "-webkit-any" | "-moz-any" => {
            most_specific(args.unwrap_or_default())
        }
        "nth-child" | "nth-last-child" => {
            // `:nth-child(An+B of S)` adds the most specific selector in S.
            let of_selector = args.and_then(|raw| {
                let lower = raw.to_ascii_lowercase();
                lower.find(" of ").map(|pos| raw[pos + 4..].to_string())
            });
            Specificity(0, 1, 0).add(
                of_selector
                    .map(|selectors| most_specific(&selectors))
                    .unwrap_or_default(),
            )
        }
        _ => Specificity(0, 1, 0),
    }
}

fn most_specific(selector_list: &str) -> Specificity {
    split_selector_list(selector_list)
        .iter()
        .map(|selector| Specificity::of(selector))
        .max()
        .unwrap_or_default()
}

/// Splits a selector list on top-level commas; commas nested in brackets,
/// parentheses or quotes stay with their selector.
pub fn split_selector_list(list: &str) -> Vec<String> {
    let mut selectors = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut in_quote: Option<char> = None;
    let mut escaped = false;
    for ch in list.chars() {
        if escaped {
            escaped = false;
            current.push(ch);
            continue;
        }
        if ch == '\\' {
            escaped = true;
            current.push(ch);
            continue;
        }
        if let Some(quote) = in_quote {
            if ch == quote {
                in_quote = None;
            }
            current.push(ch);
            continue;
        }
        match ch {
            '"' | '\'' => in_quote = Some(ch),
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                push_trimmed(&mut selectors, &current);
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(ch);
    }
    push_trimmed(&mut selectors, &current);
    selectors
}

fn push_trimmed(selectors: &mut Vec<String>, raw: &str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        selectors.push(trimmed.to_string());
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == '-' || !ch.is_ascii()
}

fn skip_ident(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() {
        let ch = chars[i];
        if ch == '\\' {
            i += 2;
            continue;
        }
        if ch.is_alphanumeric() || ch == '-' || ch == '_' || !ch.is_ascii() {
            i += 1;
        } else {
            break;
        }
    }
    i.min(chars.len())
}

/// Returns the index just past the block closing the one opened at `start`.
fn skip_block(chars: &[char], start: usize, open: char, close: char) -> usize {
    let mut depth = 0usize;
    let mut in_quote: Option<char> = None;
    let mut i = start;
    while i < chars.len() {
        let ch = chars[i];
        if let Some(quote) = in_quote {
            if ch == '\\' {
                i += 2;
                continue;
            }
            if ch == quote {
                in_quote = None;
            }
            i += 1;
            continue;
        }
        if ch == '"' || ch == '\'' {
            in_quote = Some(ch);
        } else if ch == open {
            depth += 1;
        } else if ch == close {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return i + 1;
            }
        }
        i += 1;
    }
    chars.len()
}
