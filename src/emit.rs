//! Renders [`PowerTables`] as source code.

use std::io::{self, Write};

use super::table::{Kind, PowerTables, Table};

/// The language to render.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Format {
    /// `pub static NAME: [[u64; 2]; N]` inside nested `pub
    /// mod`s.
    #[default]
    Rust,
    /// A header with `static const std::array<uint64_t, 2>
    /// name[]` inside nested namespaces.
    Cpp,
}

/// Controls how [`write`] renders the tables.
#[derive(Copy, Clone, Debug)]
pub struct Options<'a> {
    /// The output language.
    pub format: Format,
    /// A `::`-separated module or namespace path.
    ///
    /// An empty path puts the tables at the top level.
    pub namespace: &'a str,
    /// Text to copy into a comment at the top of the output.
    pub license: Option<&'a str>,
}

impl Default for Options<'_> {
    fn default() -> Self {
        Self {
            format: Format::Rust,
            namespace: "numeric",
            license: None,
        }
    }
}

impl Options<'_> {
    fn path(&self) -> impl Iterator<Item = &str> + '_ {
        self.namespace.split("::").filter(|s| !s.is_empty())
    }
}

/// Prefixes every line of `text` with `// `.
///
/// Empty lines get a bare `//` so the output has no trailing
/// whitespace.
pub fn license_comment(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 16);
    for line in text.lines() {
        if line.is_empty() {
            out.push_str("//\n");
        } else {
            out.push_str("// ");
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

/// Writes `tables` to `w`.
///
/// The output depends only on `tables` and `opts`, so it is
/// byte-for-byte reproducible.
pub fn write<W: Write>(w: &mut W, tables: &PowerTables, opts: &Options<'_>) -> io::Result<()> {
    if let Some(license) = opts.license {
        w.write_all(license_comment(license).as_bytes())?;
        writeln!(w)?;
    }
    match opts.format {
        Format::Rust => write_rust(w, tables, opts),
        Format::Cpp => write_cpp(w, tables, opts),
    }
}

fn write_rust<W: Write>(w: &mut W, tables: &PowerTables, opts: &Options<'_>) -> io::Result<()> {
    writeln!(w, "// @generated by pow5tab. Do not edit.")?;

    let mut depth = 0;
    for name in opts.path() {
        writeln!(w)?;
        indent(w, depth)?;
        writeln!(w, "pub mod {name} {{")?;
        depth += 1;
    }

    for kind in [Kind::Positive, Kind::Negative] {
        let table = tables.get(kind);
        writeln!(w)?;
        indent(w, depth)?;
        match kind {
            Kind::Positive => writeln!(
                w,
                "/// `floor(5^i / 2^(j - {}))` where `j = floor(log2(5^i))`.",
                kind.shift()
            )?,
            Kind::Negative => writeln!(
                w,
                "/// `floor(2^(j + {}) / 5^i) + 1` where `j = floor(log2(5^i))`.",
                kind.shift()
            )?,
        }
        indent(w, depth)?;
        writeln!(
            w,
            "pub static {}: [[u64; 2]; {}] = [",
            rust_name(kind),
            table.len()
        )?;
        write_entries(w, table, |w, hi, lo| {
            indent(w, depth + 1)?;
            writeln!(w, "[{hi}, {lo}],")
        })?;
        indent(w, depth)?;
        writeln!(w, "];")?;
    }

    while depth > 0 {
        depth -= 1;
        indent(w, depth)?;
        writeln!(w, "}}")?;
    }
    Ok(())
}

fn write_cpp<W: Write>(w: &mut W, tables: &PowerTables, opts: &Options<'_>) -> io::Result<()> {
    let guard = include_guard(opts);
    writeln!(w, "#ifndef {guard}")?;
    writeln!(w, "#define {guard}")?;
    writeln!(w)?;
    writeln!(w, "#include <array>")?;
    writeln!(w, "#include <cstdint>")?;
    writeln!(w)?;
    for name in opts.path() {
        writeln!(w, "namespace {name} {{")?;
    }
    writeln!(w)?;

    for kind in [Kind::Positive, Kind::Negative] {
        writeln!(
            w,
            "static const std::array<uint64_t, 2> {}[] = {{",
            cpp_name(kind)
        )?;
        write_entries(w, tables.get(kind), |w, hi, lo| {
            writeln!(w, "\t{{{hi}ULL, {lo}ULL}},")
        })?;
        writeln!(w, "}};")?;
        writeln!(w)?;
    }

    for _ in opts.path() {
        writeln!(w, "}}")?;
    }
    writeln!(w)?;
    writeln!(w, "#endif")
}

/// Calls `f` with the decimal halves of each entry, in index
/// order.
fn write_entries<W, F>(w: &mut W, table: &Table, mut f: F) -> io::Result<()>
where
    W: Write,
    F: FnMut(&mut W, &str, &str) -> io::Result<()>,
{
    let mut hi = itoa::Buffer::new();
    let mut lo = itoa::Buffer::new();
    for entry in table {
        f(w, hi.format(entry.hi), lo.format(entry.lo))?;
    }
    Ok(())
}

fn indent<W: Write>(w: &mut W, depth: usize) -> io::Result<()> {
    for _ in 0..depth {
        w.write_all(b"    ")?;
    }
    Ok(())
}

fn rust_name(kind: Kind) -> &'static str {
    match kind {
        Kind::Positive => "POSITIVE_POWER_TABLE",
        Kind::Negative => "NEGATIVE_POWER_TABLE",
    }
}

fn cpp_name(kind: Kind) -> &'static str {
    match kind {
        Kind::Positive => "positivePowerTable",
        Kind::Negative => "negativePowerTable",
    }
}

/// Returns `A_B_POWER_TABLES_H` for the namespace `a::b`.
fn include_guard(opts: &Options<'_>) -> String {
    let mut guard = String::new();
    for name in opts.path() {
        guard.push_str(&name.to_ascii_uppercase());
        guard.push('_');
    }
    guard.push_str("POWER_TABLES_H");
    guard
}
