//! Parser for Graphviz `-Tplain` output
//!
//! The format is line oriented:
//!
//! ```text
//! graph scale width height
//! node name x y width height label style shape color fillcolor
//! edge tail head n x1 y1 .. xn yn [label xl yl] style color
//! stop
//! ```
//!
//! Coordinates are in engine units with the origin at the bottom left.
//! Names containing spaces or punctuation are double-quoted.

use logos::Logos;

use super::error::LayoutError;
use super::types::Point;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r]+")]
enum PlainToken {
    #[regex(r#""([^"\\\n]|\\[^\n])*""#, |lex| {
        let s = lex.slice();
        unescape(&s[1..s.len() - 1])
    })]
    Quoted(String),

    #[regex(r#"[^ \t\r\n"]+"#, |lex| lex.slice().to_string())]
    Word(String),

    #[token("\n")]
    Newline,
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// A placed node; its reported size is checked but not kept
#[derive(Debug, Clone, PartialEq)]
pub struct PlainNode {
    pub name: String,
    /// Center of the node
    pub center: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlainEdge {
    pub tail: String,
    pub head: String,
    pub points: Vec<Point>,
}

/// A parsed `-Tplain` document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlainGraph {
    pub width: f64,
    pub height: f64,
    pub nodes: Vec<PlainNode>,
    pub edges: Vec<PlainEdge>,
}

impl PlainGraph {
    pub fn node(&self, name: &str) -> Option<&PlainNode> {
        self.nodes.iter().find(|n| n.name == name)
    }
}

/// Field cursor over one output line
struct Fields<'a> {
    line: usize,
    fields: &'a [String],
    pos: usize,
}

impl<'a> Fields<'a> {
    fn new(line: usize, fields: &'a [String]) -> Self {
        Self {
            line,
            fields,
            pos: 0,
        }
    }

    fn text(&mut self, what: &str) -> Result<&'a str, LayoutError> {
        let field = self
            .fields
            .get(self.pos)
            .ok_or_else(|| LayoutError::malformed(self.line, format!("missing {}", what)))?;
        self.pos += 1;
        Ok(field)
    }

    fn number(&mut self, what: &str) -> Result<f64, LayoutError> {
        let line = self.line;
        let text = self.text(what)?;
        text.parse::<f64>()
            .map_err(|_| LayoutError::malformed(line, format!("invalid {} '{}'", what, text)))
    }

    fn point(&mut self, what: &str) -> Result<Point, LayoutError> {
        let x = self.number(what)?;
        let y = self.number(what)?;
        Ok(Point::new(x, y))
    }

    fn remaining(&self) -> usize {
        self.fields.len().saturating_sub(self.pos)
    }
}

/// Split the output into non-empty lines of fields, keeping 1-based line numbers
fn tokenize(output: &str) -> Result<Vec<(usize, Vec<String>)>, LayoutError> {
    let mut lines = Vec::new();
    let mut current = Vec::new();
    let mut line = 1;
    let mut lexer = PlainToken::lexer(output);

    while let Some(token) = lexer.next() {
        match token {
            Ok(PlainToken::Quoted(s)) | Ok(PlainToken::Word(s)) => current.push(s),
            Ok(PlainToken::Newline) => {
                if !current.is_empty() {
                    lines.push((line, std::mem::take(&mut current)));
                }
                line += 1;
            }
            Err(()) => {
                return Err(LayoutError::malformed(
                    line,
                    format!("unexpected input {:?}", lexer.slice()),
                ))
            }
        }
    }
    if !current.is_empty() {
        lines.push((line, current));
    }
    Ok(lines)
}

/// Parse a complete `-Tplain` document
pub fn parse(output: &str) -> Result<PlainGraph, LayoutError> {
    let mut graph: Option<PlainGraph> = None;

    for (line, fields) in tokenize(output)? {
        let mut f = Fields::new(line, &fields);
        match f.text("statement")? {
            "graph" => {
                f.number("scale")?;
                graph = Some(PlainGraph {
                    width: f.number("graph width")?,
                    height: f.number("graph height")?,
                    ..Default::default()
                });
            }
            "node" => {
                let g = graph
                    .as_mut()
                    .ok_or_else(|| LayoutError::malformed(line, "node before graph line"))?;
                let name = f.text("node name")?.to_string();
                let center = f.point("node position")?;
                f.number("node width")?;
                f.number("node height")?;
                g.nodes.push(PlainNode { name, center });
            }
            "edge" => {
                let g = graph
                    .as_mut()
                    .ok_or_else(|| LayoutError::malformed(line, "edge before graph line"))?;
                let tail = f.text("edge tail")?.to_string();
                let head = f.text("edge head")?.to_string();
                let count = f.number("point count")?;
                if count < 0.0 || count.fract() != 0.0 {
                    return Err(LayoutError::malformed(
                        line,
                        format!("invalid point count '{}'", count),
                    ));
                }
                let points = (0..count as usize)
                    .map(|_| f.point("edge point"))
                    .collect::<Result<Vec<_>, _>>()?;
                // label text, x, y come before the trailing style and color
                if f.remaining() >= 5 {
                    f.text("edge label")?;
                    f.point("label position")?;
                }
                g.edges.push(PlainEdge { tail, head, points });
            }
            "stop" => break,
            other => {
                log::debug!(line, statement = other; "Skipping unknown plain output statement");
            }
        }
    }

    graph.ok_or_else(|| LayoutError::malformed(1, "missing graph line"))
}
