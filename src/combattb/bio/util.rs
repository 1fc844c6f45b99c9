use itertools::Itertools;

// A FASTA record with the residues wrapped at line_width characters.  A
// line_width of 0 puts all the residues on one line.
pub fn format_fasta(id: &str, maybe_desc: Option<&str>, residues: &str,
                    line_width: usize) -> String {
    let mut ret = format!(">{}", id);

    if let Some(desc) = maybe_desc {
        ret.push(' ');
        ret.push_str(desc);
    }

    ret.push('\n');

    if residues.is_empty() {
        ret.push('\n');
        return ret;
    }

    if line_width == 0 {
        ret.push_str(residues);
        ret.push('\n');
        return ret;
    }

    for line in &residues.chars().chunks(line_width) {
        ret.extend(line);
        ret.push('\n');
    }

    ret
}

// case is preserved, anything that isn't A, C, G or T is returned unchanged
pub fn complement(base: char) -> char {
    match base {
        'A' => 'T',
        'T' => 'A',
        'C' => 'G',
        'G' => 'C',
        'a' => 't',
        't' => 'a',
        'c' => 'g',
        'g' => 'c',
        _ => base,
    }
}

pub fn rev_comp(residues: &str) -> String {
    residues.chars().rev().map(complement).collect()
}

#[test]
fn test_format_fasta() {
    assert_eq!(format_fasta("NC_000962.3", None, "", 60), ">NC_000962.3\n\n");
    assert_eq!(format_fasta("Rv0001", Some("Gene"), "TTGACCGA", 4),
               ">Rv0001 Gene\nTTGA\nCCGA\n");
    assert_eq!(format_fasta("Rv0001", Some("Gene"), "TTGACCGATG", 4),
               ">Rv0001 Gene\nTTGA\nCCGA\nTG\n");
    assert_eq!(format_fasta("Rv0002", None, "GTGGCTGAT", 60), ">Rv0002\nGTGGCTGAT\n");
}

#[test]
fn test_format_fasta_zero_width() {
    assert_eq!(format_fasta("Rv0001", None, "TTGACCGATGAC", 0), ">Rv0001\nTTGACCGATGAC\n");
    assert_eq!(format_fasta("Rv0001", None, "", 0), ">Rv0001\n\n");
}

#[test]
fn test_rev_comp() {
    assert_eq!(rev_comp(""), "");
    assert_eq!(rev_comp("GGTT"), "AACC");
    assert_eq!(rev_comp("AACCGGTT"), "AACCGGTT");
    assert_eq!(rev_comp("acgTN"), "NAcgt");
    assert_eq!(rev_comp("AC-gt*"), "*ac-GT");
}
