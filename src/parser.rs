// parser.rs

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedLine {
    pub argv: Vec<String>,
    pub background: bool,
}

impl ParsedLine {
    pub fn is_empty(&self) -> bool {
        self.argv.is_empty()
    }
}

/// Splits a command line into arguments, honouring quotes and backslash
/// escapes, and strips a trailing unquoted `&` into `background`.
pub fn tokenize(line: &str) -> ParsedLine {
    let mut argv = Vec::new();
    let mut cur = String::new();
    let mut in_token = false;
    // Set while the last character pushed to `cur` is an unquoted `&`.
    let mut ends_with_amp = false;
    let mut chars = line.chars().peekable();
    enum State { Normal, Single, Double }
    let mut state = State::Normal;
    while let Some(ch) = chars.next() {
        match state {
            State::Normal => match ch {
                '\'' => {
                    state = State::Single;
                    in_token = true;
                    ends_with_amp = false;
                }
                '"' => {
                    state = State::Double;
                    in_token = true;
                    ends_with_amp = false;
                }
                '\\' => {
                    if let Some(next) = chars.next() {
                        cur.push(next);
                        in_token = true;
                        ends_with_amp = false;
                    }
                }
                c if c.is_whitespace() => {
                    if in_token {
                        argv.push(std::mem::take(&mut cur));
                        in_token = false;
                    }
                }
                _ => {
                    cur.push(ch);
                    in_token = true;
                    ends_with_amp = ch == '&';
                }
            },
            State::Single => match ch {
                '\'' => state = State::Normal,
                _ => cur.push(ch),
            },
            State::Double => match ch {
                '"' => state = State::Normal,
                '\\' => match chars.peek() {
                    Some(&next @ ('\\' | '"' | '$')) => {
                        cur.push(next);
                        chars.next();
                    }
                    _ => cur.push('\\'),
                },
                _ => cur.push(ch),
            },
        }
    }
    if in_token {
        argv.push(cur);
    }

    let mut background = false;
    if ends_with_amp {
        if let Some(last) = argv.last_mut() {
            last.pop();
            background = true;
            if last.is_empty() {
                argv.pop();
            }
        }
    }
    ParsedLine { argv, background }
}

/// Id named by a `!<n>` recall token, read the way C `atoi` reads it: leading
/// whitespace and a `+` are skipped, then only the leading digits count.
/// Anything unparsable, negative or out of range reads as 0, which is never a
/// valid id.
pub fn parse_event_id(token: &str) -> u64 {
    let rest = token.strip_prefix('!').unwrap_or(token).trim_start();
    let digits = rest.strip_prefix('+').unwrap_or(rest);
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse().unwrap_or(0)
}
