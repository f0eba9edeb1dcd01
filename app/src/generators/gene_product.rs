// ==============================================================================
// generators/gene_product.rs - Gene Product Sentences
// ==============================================================================
// Description: Turns a feature's product annotation and feature type into an
//              English sentence (tRNA, rRNA, misc_RNA, CDS, other types)
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================
// Examples:
//   tRNA  "tRNA-Ala-GCA"       → "This feature's product is a transfer RNA
//                                 for Alanine from codon GCA."
//   rRNA  "5S ribosomal RNA"   → "This feature's product is a 5S ribosomal RNA."
//   gene  ""                   → "This feature is a gene."
// ==============================================================================

use regex::Regex;
use std::sync::LazyLock;

// tRNA-<amino acid>[-<codon>]
static RE_TRNA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^tRNA-([A-Za-z]{3})(?:-([A-Za-z]{3}))?$").expect("valid tRNA product regex")
});
// " ## " or ";" separated annotation segments
static RE_SEGMENT_DELIMITER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*##\s*|\s*;\s*").expect("valid segment delimiter regex"));
static RE_RNA_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:ribosomal\s+)?r?RNA\b").expect("valid RNA name regex")
});

/// Standard amino acids by three-letter code
const AMINO_ACIDS: [(&str, &str); 20] = [
    ("Ala", "Alanine"),
    ("Arg", "Arginine"),
    ("Asn", "Asparagine"),
    ("Asp", "Aspartic acid"),
    ("Cys", "Cysteine"),
    ("Gln", "Glutamine"),
    ("Glu", "Glutamic acid"),
    ("Gly", "Glycine"),
    ("His", "Histidine"),
    ("Ile", "Isoleucine"),
    ("Leu", "Leucine"),
    ("Lys", "Lysine"),
    ("Met", "Methionine"),
    ("Phe", "Phenylalanine"),
    ("Pro", "Proline"),
    ("Ser", "Serine"),
    ("Thr", "Threonine"),
    ("Trp", "Tryptophan"),
    ("Tyr", "Tyrosine"),
    ("Val", "Valine"),
];

/// Full amino acid name for a three-letter code (case-sensitive)
pub fn amino_acid_name(code: &str) -> Option<&'static str> {
    AMINO_ACIDS
        .iter()
        .find(|(abbrev, _)| *abbrev == code)
        .map(|(_, name)| *name)
}

/// "a" or "an" for the word that follows
///
/// Vowel-initial words take "an", as does a leading `8` ("an 8S ...").
pub fn indefinite_article(word: &str) -> &'static str {
    match word.chars().next() {
        Some(c) if "aeiouAEIOU8".contains(c) => "an",
        _ => "a",
    }
}

/// Drop trailing comments from a product annotation
///
/// Everything from the first `#` is removed, then any trailing parenthetical
/// groups, e.g. `"DNA polymerase III (EC 2.7.7.7) # partial"` becomes
/// `"DNA polymerase III"`.
pub fn strip_comment(product: &str) -> String {
    let mut text = match product.find('#') {
        Some(pos) => &product[..pos],
        None => product,
    }
    .trim_end();

    while text.ends_with(')') {
        let mut depth = 0usize;
        let mut open = None;
        for (pos, byte) in text.bytes().enumerate().rev() {
            match byte {
                b')' => depth += 1,
                b'(' => {
                    depth -= 1;
                    if depth == 0 {
                        open = Some(pos);
                        break;
                    }
                }
                _ => {}
            }
        }
        match open {
            Some(pos) => text = text[..pos].trim_end(),
            None => break,
        }
    }

    text.trim().to_string()
}

/// Sentence describing a feature's product, dispatched on feature type
pub fn describe_product(product: &str, feature_type: &str) -> String {
    match feature_type {
        "tRNA" => describe_trna(product),
        "rRNA" => describe_rrna(product),
        "misc_RNA" => describe_misc_rna(product),
        "CDS" => strip_comment(product),
        other => describe_other(other),
    }
}

fn describe_trna(product: &str) -> String {
    let product = product.trim();
    if product.is_empty() {
        return "This feature's product is an unknown type of transfer RNA.".to_string();
    }

    let Some(caps) = RE_TRNA.captures(product) else {
        return format!("This feature's product is a transfer RNA described as \"{product}\".");
    };

    let code = &caps[1];
    let amino_acid = match amino_acid_name(code) {
        Some(name) => name.to_string(),
        None => format!("an unknown amino acid {code}"),
    };

    match caps.get(2) {
        Some(codon) => format!(
            "This feature's product is a transfer RNA for {amino_acid} from codon {}.",
            codon.as_str()
        ),
        None => format!("This feature's product is a transfer RNA for {amino_acid}."),
    }
}

fn describe_rrna(product: &str) -> String {
    let product = product.trim();
    if product.is_empty() {
        return "This feature's product is an unknown ribosomal RNA.".to_string();
    }
    if product.contains("LSU") {
        return "This feature's product is the large subunit (LSU) ribosomal RNA.".to_string();
    }
    if product.contains("SSU") {
        return "This feature's product is the small subunit (16S) ribosomal RNA.".to_string();
    }

    let segment = longest_segment(product);
    if RE_RNA_NAME.is_match(segment) {
        let renamed = RE_RNA_NAME.replace(segment, "ribosomal RNA");
        format!(
            "This feature's product is {} {}.",
            indefinite_article(&renamed),
            renamed
        )
    } else {
        format!("This feature's product is a ribosomal RNA of type {segment}.")
    }
}

/// Longest delimiter-separated segment, first one wins on ties
fn longest_segment(product: &str) -> &str {
    RE_SEGMENT_DELIMITER
        .split(product)
        .map(str::trim)
        .fold("", |best, segment| {
            if segment.len() > best.len() {
                segment
            } else {
                best
            }
        })
}

fn describe_misc_rna(product: &str) -> String {
    let product = product.trim();
    if product.is_empty() {
        "This feature's product is an unknown miscellaneous RNA.".to_string()
    } else {
        format!("This feature's product is the miscellaneous RNA {product}.")
    }
}

fn describe_other(feature_type: &str) -> String {
    let readable = feature_type.trim().replace('_', " ");
    if readable.is_empty() {
        return "This feature is of unknown type.".to_string();
    }
    format!(
        "This feature is {} {}.",
        indefinite_article(&readable),
        readable
    )
}
