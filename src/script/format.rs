use crate::{
    foundation::error::ColrResult,
    paint::decompiler::quote,
    script::{
        ast::{Expr, ExprKind, Stmt},
        parser::parse_program,
    },
};

const INDENT: usize = 4;

/// Re-wrap script text so lines stay within `width` columns where possible.
///
/// Brackets that do not fit are exploded one level at a time: first with
/// all items on one indented line, then one item per line with a trailing
/// comma. Atoms are never split. Comments are dropped.
pub fn format_source(text: &str, width: usize) -> ColrResult<String> {
    let program = parse_program(text)?;
    let f = Formatter { src: text, width };
    let mut out = String::new();
    for stmt in &program {
        out.push_str(&f.statement(stmt));
        out.push('\n');
    }
    Ok(out)
}

struct Formatter<'a> {
    src: &'a str,
    width: usize,
}

// One item inside a bracket, with whatever precedes its value.
struct Part<'e> {
    prefix: String,
    expr: &'e Expr,
}

impl Formatter<'_> {
    fn statement(&self, stmt: &Stmt) -> String {
        let (lead, value) = match stmt {
            Stmt::Assign { name, value } => (format!("{name} = "), value),
            Stmt::SetItem {
                target,
                index,
                value,
            } => (
                format!("{}[{}] = ", self.flat(target), self.flat(index)),
                value,
            ),
            Stmt::Expr(e) => (String::new(), e),
        };
        let body = self.layout(value, 0, lead.len(), 0);
        lead + &body
    }

    fn flat(&self, e: &Expr) -> String {
        match &e.kind {
            ExprKind::Number(_) | ExprKind::Unary { .. } | ExprKind::Binary { .. } => {
                self.src[e.span.start..e.span.end].to_owned()
            }
            ExprKind::Str(s) => quote(s),
            ExprKind::Bool(true) => "True".to_owned(),
            ExprKind::Bool(false) => "False".to_owned(),
            ExprKind::None => "None".to_owned(),
            ExprKind::Name(n) => n.clone(),
            ExprKind::Tuple(items) if items.len() == 1 => format!("({},)", self.flat(&items[0])),
            ExprKind::Tuple(items) => format!("({})", self.join(items)),
            ExprKind::List(items) => format!("[{}]", self.join(items)),
            ExprKind::Dict(_) | ExprKind::Call { .. } => {
                let (open, parts, close) = self.parts(e).unwrap_or_default();
                let body: Vec<String> = parts
                    .iter()
                    .map(|p| format!("{}{}", p.prefix, self.flat(p.expr)))
                    .collect();
                format!("{open}{}{close}", body.join(", "))
            }
            ExprKind::Index { target, index } => {
                format!("{}[{}]", self.flat(target), self.flat(index))
            }
        }
    }

    fn join(&self, items: &[Expr]) -> String {
        items
            .iter()
            .map(|e| self.flat(e))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn parts<'e>(&self, e: &'e Expr) -> Option<(String, Vec<Part<'e>>, &'static str)> {
        Some(match &e.kind {
            ExprKind::Call { func, args, kwargs } => {
                let mut parts = plain(args);
                parts.extend(kwargs.iter().map(|(k, expr)| Part {
                    prefix: format!("{k}="),
                    expr,
                }));
                (format!("{func}("), parts, ")")
            }
            ExprKind::Tuple(items) => ("(".to_owned(), plain(items), ")"),
            ExprKind::List(items) => ("[".to_owned(), plain(items), "]"),
            ExprKind::Dict(entries) => {
                let parts = entries
                    .iter()
                    .map(|(k, expr)| Part {
                        prefix: format!("{}: ", self.flat(k)),
                        expr,
                    })
                    .collect();
                ("{".to_owned(), parts, "}")
            }
            _ => return None,
        })
    }

    // `lead` columns are taken on the first line; `tail` columns follow the last.
    fn layout(&self, e: &Expr, indent: usize, lead: usize, tail: usize) -> String {
        let flat = self.flat(e);
        if lead + flat.len() + tail <= self.width {
            return flat;
        }
        let Some((open, parts, close)) = self.parts(e) else {
            return flat;
        };
        if parts.is_empty() {
            return flat;
        }

        let inner = indent + INDENT;
        let pad = " ".repeat(inner);
        let closing = format!("{}{close}", " ".repeat(indent));
        let one_tuple = matches!(&e.kind, ExprKind::Tuple(items) if items.len() == 1);

        let hugged: Vec<String> = parts
            .iter()
            .map(|p| format!("{}{}", p.prefix, self.flat(p.expr)))
            .collect();
        let hugged = hugged.join(", ");
        if !one_tuple && inner + hugged.len() <= self.width {
            return format!("{open}\n{pad}{hugged}\n{closing}");
        }

        let mut out = format!("{open}\n");
        for p in &parts {
            out.push_str(&pad);
            out.push_str(&p.prefix);
            out.push_str(&self.layout(p.expr, inner, inner + p.prefix.len(), 1));
            out.push_str(",\n");
        }
        out.push_str(&closing);
        out
    }
}

fn plain(items: &[Expr]) -> Vec<Part<'_>> {
    items
        .iter()
        .map(|expr| Part {
            prefix: String::new(),
            expr,
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/script/format.rs"]
mod tests;
