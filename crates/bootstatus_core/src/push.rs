/// One decoded push-channel line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushEvent<'a> {
    Status(&'a str),
    Error(&'a str),
    Unknown { code: &'a str },
}

/// Split `<code>: <payload>` at the first colon. A line without a colon has no known code.
pub fn parse_push_line(line: &str) -> PushEvent<'_> {
    let Some((code, rest)) = line.split_once(':') else {
        return PushEvent::Unknown { code: "" };
    };
    let payload = rest.strip_prefix(' ').unwrap_or(rest);
    match code {
        "s" => PushEvent::Status(payload),
        "e" => PushEvent::Error(payload),
        _ => PushEvent::Unknown { code },
    }
}
