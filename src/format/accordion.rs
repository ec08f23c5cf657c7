// src/format/accordion.rs
// =============================================================================
// Converts Hugo `details` shortcodes into Fumadocs accordions.
//
//   {{% details title="Week 1" closed="true" %}}      <Accordions>
//   notes                                       ->    <Accordion title="Week 1">
//   {{% /details %}}                                  notes
//                                                     </Accordion>
//                                                     </Accordions>
//
// Accordions that follow each other (only blank lines in between) share
// one <Accordions> wrapper.
//
// How it works, in a single pass over lines:
// 1. Split every line at shortcodes so each open/close tag gets its own
//    line (text around a tag is kept, trimmed, on its own line)
// 2. Feed the lines through a small state machine:
//      Outside      -> an <Accordion line opens a run (emit <Accordions>)
//      InsideRun    -> track nesting depth; at depth 0, blank lines are
//                      held back until we know whether another accordion
//                      follows (run continues) or not (emit </Accordions>)
//      InsideGroup  -> an existing <Accordions> block, copied verbatim, so
//                      running the pass twice changes nothing
// =============================================================================

use regex::Regex;

const OPEN_TAG: &str = "<Accordion ";
const CLOSE_TAG: &str = "</Accordion>";
const GROUP_OPEN: &str = "<Accordions>";
const GROUP_CLOSE: &str = "</Accordions>";

#[derive(Debug, Clone)]
pub struct AccordionConverter {
    shortcode: Regex,
}

#[derive(Debug)]
enum State {
    Outside,
    InsideRun { depth: usize, held_blanks: Vec<String> },
    InsideGroup { depth: usize },
}

impl AccordionConverter {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            shortcode: Regex::new(
                r#"\{\{%\s*details\s+title="([^"]*)"[^%]*%\}\}|\{\{%\s*/details\s*%\}\}"#,
            )?,
        })
    }

    pub fn convert(&self, content: &str) -> String {
        let mut lines = Vec::new();
        for line in content.split('\n') {
            self.split_line(line, &mut lines);
        }

        let mut out: Vec<String> = Vec::with_capacity(lines.len() + 2);
        let mut state = State::Outside;

        for line in lines {
            state = match state {
                State::Outside => start_line(line, &mut out),
                State::InsideGroup { depth } => {
                    let depth = depth + count(&line, GROUP_OPEN);
                    let depth = depth.saturating_sub(count(&line, GROUP_CLOSE));
                    out.push(line);
                    if depth == 0 {
                        State::Outside
                    } else {
                        State::InsideGroup { depth }
                    }
                }
                State::InsideRun {
                    depth: 0,
                    mut held_blanks,
                } => {
                    if line.trim().is_empty() {
                        held_blanks.push(line);
                        State::InsideRun {
                            depth: 0,
                            held_blanks,
                        }
                    } else if line.contains(OPEN_TAG) {
                        // Another accordion: the run continues
                        out.append(&mut held_blanks);
                        let depth = nesting_change(0, &line);
                        out.push(line);
                        State::InsideRun {
                            depth,
                            held_blanks: Vec::new(),
                        }
                    } else {
                        out.push(GROUP_CLOSE.to_string());
                        out.append(&mut held_blanks);
                        start_line(line, &mut out)
                    }
                }
                State::InsideRun { depth, held_blanks } => {
                    let depth = nesting_change(depth, &line);
                    out.push(line);
                    State::InsideRun { depth, held_blanks }
                }
            };
        }

        if let State::InsideRun { held_blanks, .. } = state {
            out.push(GROUP_CLOSE.to_string());
            out.extend(held_blanks);
        }

        out.join("\n")
    }

    // Puts each shortcode on its own line, rewritten as a JSX tag
    fn split_line(&self, line: &str, out: &mut Vec<String>) {
        if !self.shortcode.is_match(line) {
            out.push(line.to_string());
            return;
        }

        let mut last = 0;
        for caps in self.shortcode.captures_iter(line) {
            let Some(whole) = caps.get(0) else { continue };

            push_text(&line[last..whole.start()], out);
            match caps.get(1) {
                Some(title) => out.push(format!("<Accordion title=\"{}\">", title.as_str())),
                None => out.push(CLOSE_TAG.to_string()),
            }
            last = whole.end();
        }
        push_text(&line[last..], out);
    }
}

// Handles a line seen while outside any accordion structure
fn start_line(line: String, out: &mut Vec<String>) -> State {
    if line.trim_start().starts_with(GROUP_OPEN) {
        let depth = count(&line, GROUP_OPEN).saturating_sub(count(&line, GROUP_CLOSE));
        out.push(line);
        if depth == 0 {
            State::Outside
        } else {
            State::InsideGroup { depth }
        }
    } else if line.contains(OPEN_TAG) {
        out.push(GROUP_OPEN.to_string());
        let depth = nesting_change(0, &line);
        out.push(line);
        State::InsideRun {
            depth,
            held_blanks: Vec::new(),
        }
    } else {
        out.push(line);
        State::Outside
    }
}

fn nesting_change(depth: usize, line: &str) -> usize {
    (depth + count(line, OPEN_TAG)).saturating_sub(count(line, CLOSE_TAG))
}

fn count(line: &str, tag: &str) -> usize {
    line.matches(tag).count()
}

fn push_text(text: &str, out: &mut Vec<String>) {
    let text = text.trim();
    if !text.is_empty() {
        out.push(text.to_string());
    }
}
