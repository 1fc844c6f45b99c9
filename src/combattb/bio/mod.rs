pub mod util;
pub mod residues;
