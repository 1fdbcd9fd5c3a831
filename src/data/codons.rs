//! Standard genetic code (NCBI translation table 1).
//!
//! Codons are indexed with `A=0, C=1, G=2, T=3` as `b1 * 16 + b2 * 4 + b3`,
//! i.e. `AAA, AAC, AAG, AAT, ACA, ...`. Stop codons are `*`.

const STANDARD_AA: [u8; 64] = [
    b'K', b'N', b'K', b'N', b'T', b'T', b'T', b'T', b'R', b'S', b'R', b'S',
    b'I', b'I', b'M', b'I', b'Q', b'H', b'Q', b'H', b'P', b'P', b'P', b'P',
    b'R', b'R', b'R', b'R', b'L', b'L', b'L', b'L', b'E', b'D', b'E', b'D',
    b'A', b'A', b'A', b'A', b'G', b'G', b'G', b'G', b'V', b'V', b'V', b'V',
    b'*', b'Y', b'*', b'Y', b'S', b'S', b'S', b'S', b'*', b'C', b'W', b'C',
    b'L', b'F', b'L', b'F',
];

fn base_index(b: u8) -> Option<usize> {
    match b {
        b'A' => Some(0),
        b'C' => Some(1),
        b'G' => Some(2),
        b'T' | b'U' => Some(3),
        _ => None,
    }
}

/// One-letter amino acid (or `*`) for an uppercase DNA/RNA codon.
pub fn translate_codon(codon: &[u8]) -> Option<u8> {
    if codon.len() != 3 {
        return None;
    }
    let idx = base_index(codon[0])? * 16 + base_index(codon[1])? * 4 + base_index(codon[2])?;
    Some(STANDARD_AA[idx])
}

/// Three-letter name for a one-letter residue; stops are `"Stop"`.
pub fn three_letter(aa: u8) -> &'static str {
    match aa {
        b'A' => "Ala",
        b'R' => "Arg",
        b'N' => "Asn",
        b'D' => "Asp",
        b'C' => "Cys",
        b'Q' => "Gln",
        b'E' => "Glu",
        b'G' => "Gly",
        b'H' => "His",
        b'I' => "Ile",
        b'L' => "Leu",
        b'K' => "Lys",
        b'M' => "Met",
        b'F' => "Phe",
        b'P' => "Pro",
        b'S' => "Ser",
        b'T' => "Thr",
        b'W' => "Trp",
        b'Y' => "Tyr",
        b'V' => "Val",
        b'*' => "Stop",
        _ => "Xaa",
    }
}
