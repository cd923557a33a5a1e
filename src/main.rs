use std::sync::LazyLock;

use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme};
use polyhelm::{
    ConnectivityEngine, MonomerDatabase, NotationParser, PolymerKind, SimplePolymer, errors::Result,
};
use rustyline::DefaultEditor;

static DB: LazyLock<MonomerDatabase> = LazyLock::new(MonomerDatabase::default);
static ENGINE: LazyLock<ConnectivityEngine> = LazyLock::new(ConnectivityEngine::new);

fn main() -> rustyline::Result<()> {
    let parser = NotationParser::new(&*DB);
    let mut rl = DefaultEditor::new()?;
    while let Ok(line) = rl.readline("Polymer: ") {
        rl.add_history_entry(&line)?;
        let Some((kind, notation)) = line.trim().split_once(char::is_whitespace) else {
            println!("Expected a polymer type and notation, like `RNA R(A)P.R(C)P`\n");
            continue;
        };
        match polymer_info(&parser, kind, notation.trim()) {
            Ok(info) => print!("{info}"),
            Err(diagnostic) => render_error(*diagnostic),
        }
    }
    Ok(())
}

fn polymer_info(parser: &NotationParser<MonomerDatabase>, kind: &str, notation: &str) -> Result<String> {
    let kind: PolymerKind = kind.parse()?;
    let polymer = parser.parse(kind, notation)?;

    let ids: Vec<_> = polymer.monomer_ids().collect();
    let mut info = format!("Monomers ({}): {}\n", polymer.monomer_count(), ids.join(" "));
    match kind {
        PolymerKind::NucleicAcid => {
            info += &format!("Sequence: {}\n", polymer.nucleotide_sequence()?);
            info += &format!("Modified Sequence: {}\n", polymer.modified_nucleotide_sequence()?);
            info += &nucleotides(&polymer)?;
        }
        PolymerKind::Peptide => {
            info += &format!("Sequence: {}\n", polymer.peptide_sequence()?);
            info += &format!("Modified Sequence: {}\n", polymer.modified_peptide_sequence("-")?);
        }
        PolymerKind::Chemical => (),
    }
    info += &format!("Complex Notation: {}\n", polymer.complex_notation());

    // NOTE: Linear polymers aren't always cyclisable, so a missing canonical form isn't an error here
    match polymer.canonical_entry() {
        Ok(entry) => info += &format!("Canonical Form: {} (offset {})\n", entry.notation, entry.offset),
        Err(error) => info += &format!("Canonical Form: none ({error})\n"),
    }

    let assembled = polymer.assemble(&*ENGINE)?;
    let open: Vec<_> = assembled.open_attachments.keys().map(ToString::to_string).collect();
    info += &format!("Open Attachments: {}\n\n", open.join(", "));

    Ok(info)
}

fn nucleotides(polymer: &SimplePolymer<MonomerDatabase>) -> Result<String> {
    let symbols: Vec<_> = polymer
        .strict_nucleotides()?
        .into_iter()
        .map(|nucleotide| nucleotide.symbol)
        .collect();
    Ok(format!("Nucleotides: {}\n", symbols.join(" ")))
}

fn render_error(diagnostic: impl Into<Box<dyn Diagnostic + 'static>>) {
    let mut buf = String::new();
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode());
    if handler.render_report(&mut buf, diagnostic.into().as_ref()).is_ok() {
        println!("{buf}");
    }
}
