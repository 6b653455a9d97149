/// A token accepted for reverse lookup.
///
/// The address is kept as text. The format check is loose and accepts
/// dotted digit strings that are not valid IPv4 addresses, e.g. `999.999.1.1`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LookupRequest {
    pub ip: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Classified {
    Lookup(LookupRequest),
    Unsupported(String),
}

/// Decide whether a raw input token is looked up.
///
/// Accepts a non-empty run of ASCII digits and dots once surrounding
/// whitespace is trimmed. Anything else is `Unsupported`.
pub fn classify(token: &str) -> Classified {
    let trimmed = token.trim();
    let is_dotted_digits = !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit() || c == '.');

    match is_dotted_digits {
        true => Classified::Lookup(LookupRequest {
            ip: trimmed.to_owned(),
        }),
        false => Classified::Unsupported(token.to_owned()),
    }
}

/// Split tokens into lookup requests and unsupported input, keeping input order.
pub fn partition<I, S>(tokens: I) -> (Vec<LookupRequest>, Vec<String>)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut requests = Vec::new();
    let mut unsupported = Vec::new();

    for token in tokens {
        match classify(token.as_ref()) {
            Classified::Lookup(request) => requests.push(request),
            Classified::Unsupported(token) => unsupported.push(token),
        }
    }

    (requests, unsupported)
}
