//! Batch helpers that fan independent documents out over rayon when the
//! `parallel` feature is enabled, and run sequentially otherwise.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{Document, Format, ParseOptions, PrintOptions, Result};

fn parse_one<I: AsRef<[u8]>>(input: &I, format: Format, options: &ParseOptions) -> Result<Document> {
    let mut doc = Document::with_options(options.clone());
    doc.parse(input, format)?;
    Ok(doc)
}

#[cfg(feature = "parallel")]
pub fn parse_all<I>(inputs: &[I], format: Format, options: &ParseOptions) -> Vec<Result<Document>>
where
    I: AsRef<[u8]> + Sync,
{
    inputs
        .par_iter()
        .map(|input| parse_one(input, format, options))
        .collect()
}

#[cfg(not(feature = "parallel"))]
pub fn parse_all<I>(inputs: &[I], format: Format, options: &ParseOptions) -> Vec<Result<Document>>
where
    I: AsRef<[u8]>,
{
    inputs
        .iter()
        .map(|input| parse_one(input, format, options))
        .collect()
}

#[cfg(feature = "parallel")]
pub fn print_all(docs: &[Document], options: &PrintOptions) -> Vec<Result<Vec<u8>>> {
    docs.par_iter()
        .map(|doc| doc.print_with_options(options))
        .collect()
}

#[cfg(not(feature = "parallel"))]
pub fn print_all(docs: &[Document], options: &PrintOptions) -> Vec<Result<Vec<u8>>> {
    docs.iter()
        .map(|doc| doc.print_with_options(options))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    fn test_batch_keeps_input_order() {
        let inputs = ["[a]\nx=1\n", "[b]\ny=2\n", "x=orphan\n"];
        let docs = parse_all(&inputs, Format::Ini, &ParseOptions::default());
        assert_eq!(docs.len(), 3);
        assert!(docs[2].is_err());

        let docs: Vec<Document> = docs.into_iter().filter_map(Result::ok).collect();
        let printed = print_all(&docs, &PrintOptions::default());
        assert_eq!(printed[0].as_ref().unwrap(), b"[a]\nx=1\n\n");
        assert_eq!(printed[1].as_ref().unwrap(), b"[b]\ny=2\n\n");
    }
}
