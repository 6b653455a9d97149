use std::fs::read_to_string;

use anyhow::{Context, Result};
use rand::Rng;

/// Read lookup tokens from a file, one per line. Blank lines are skipped.
pub fn read_tokens(filename: &str) -> Result<Vec<String>> {
    let contents = read_to_string(filename).with_context(|| format!("Unable to read input file `{filename}`"))?;
    Ok(parse_tokens(&contents))
}

pub fn parse_tokens(contents: &str) -> Vec<String> {
    contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.to_owned())
        .collect()
}

/// A random IPv4 address for demo input.
/// First octet in 1..126, the rest in 1..255.
pub fn random_ip() -> String {
    let mut rng = rand::rng();
    let first: u8 = rng.random_range(1..126);
    let rest: Vec<String> = (0..3).map(|_| rng.random_range(1..255u8).to_string()).collect();
    format!("{first}.{}", rest.join("."))
}

pub fn random_ips(count: usize) -> Vec<String> {
    (0..count).map(|_| random_ip()).collect()
}
