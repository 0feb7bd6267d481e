use serde_json::{Map, Value};

use super::error::ElementSetError;

/// Name (if any), line 1 and line 2 of one TLE block.
pub type TleBlock = (Option<String>, String, String);

/// Split a single TLE block into its lines. Accepts the 2-line form and the
/// 3-line form with a leading name line.
pub fn parse_tle_lines(tle: &str) -> Result<TleBlock, ElementSetError> {
    let lines: Vec<String> = tle
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect();

    match lines.len() {
        2 => Ok((None, lines[0].clone(), lines[1].clone())),
        3 => Ok((
            Some(strip_name_prefix(&lines[0]).to_string()),
            lines[1].clone(),
            lines[2].clone(),
        )),
        n => Err(ElementSetError::TleArity(n)),
    }
}

/// Parse multi-satellite TLE content. Lines that do not belong to a block
/// are skipped.
pub fn parse_multi_tle(content: &str) -> Vec<TleBlock> {
    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let mut blocks = Vec::new();
    let mut rest = lines.as_slice();

    while let [first, tail @ ..] = rest {
        rest = match rest {
            [l1, l2, ..] if is_line(l1, '1') && is_line(l2, '2') => {
                blocks.push((None, l1.to_string(), l2.to_string()));
                &rest[2..]
            }
            [name, l1, l2, ..] if is_line(l1, '1') && is_line(l2, '2') => {
                let name = strip_name_prefix(name).to_string();
                blocks.push((Some(name), l1.to_string(), l2.to_string()));
                &rest[3..]
            }
            _ => {
                log::debug!("skipping unrecognized TLE line {:?}", first);
                tail
            }
        };
    }

    blocks
}

fn is_line(line: &str, number: char) -> bool {
    let mut chars = line.chars();
    chars.next() == Some(number) && chars.next() == Some(' ')
}

/// Inclination in degrees from columns 9-16 of TLE line 2.
pub fn inclination_from_line2(line2: &str) -> Result<f64, ElementSetError> {
    let field = line2
        .get(8..16)
        .ok_or_else(|| ElementSetError::InvalidInclination(line2.to_string()))?;
    parse_inclination(field)
}

pub fn parse_inclination(text: &str) -> Result<f64, ElementSetError> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ElementSetError::InvalidInclination(text.to_string()))
}

/// String-valued OMM field.
pub fn omm_str<'a>(
    record: &'a Map<String, Value>,
    key: &'static str,
) -> Result<&'a str, ElementSetError> {
    match record.get(key) {
        None | Some(Value::Null) => Err(ElementSetError::MissingField(key)),
        Some(Value::String(s)) if s.trim().is_empty() => Err(ElementSetError::MissingField(key)),
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(_) => Err(ElementSetError::InvalidField(key)),
    }
}

/// Numeric OMM field. Space-Track publishes numbers as strings, so both
/// representations are accepted.
pub fn omm_f64(record: &Map<String, Value>, key: &'static str) -> Result<f64, ElementSetError> {
    match record.get(key) {
        None | Some(Value::Null) => Err(ElementSetError::MissingField(key)),
        Some(Value::Number(n)) => n.as_f64().ok_or(ElementSetError::InvalidField(key)),
        Some(Value::String(s)) => {
            parse_inclination(s).map_err(|_| ElementSetError::InvalidField(key))
        }
        Some(_) => Err(ElementSetError::InvalidField(key)),
    }
}

// "0 ISS (ZARYA)" is the catalog form of a name line
fn strip_name_prefix(line: &str) -> &str {
    line.strip_prefix("0 ").unwrap_or(line).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const L1: &str = "1 25544U 98067A   25087.50000000  .00016717  00000-0  30147-3 0  9997";
    const L2: &str = "2 25544  51.6386 123.4567 0004123  45.6789 314.4567 15.49512345499997";

    #[test]
    fn two_and_three_line_blocks() {
        let (name, l1, l2) = parse_tle_lines(&format!("{L1}\n{L2}\n")).unwrap();
        assert!(name.is_none());
        assert_eq!(l1, L1);
        assert_eq!(l2, L2);

        let (name, _, _) = parse_tle_lines(&format!("0 ISS (ZARYA)\n{L1}\n{L2}")).unwrap();
        assert_eq!(name.as_deref(), Some("ISS (ZARYA)"));
    }

    #[test]
    fn wrong_line_count_is_rejected() {
        assert!(matches!(parse_tle_lines(L1), Err(ElementSetError::TleArity(1))));
        assert!(matches!(
            parse_tle_lines(&format!("a\nb\n{L1}\n{L2}")),
            Err(ElementSetError::TleArity(4))
        ));
    }

    #[test]
    fn multi_tle_mixes_named_and_unnamed_blocks() {
        let content = format!("ISS\n{L1}\n{L2}\n\n{L1}\n{L2}\njunk\n{L1}\n");
        let blocks = parse_multi_tle(&content);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].0.as_deref(), Some("ISS"));
        assert!(blocks[1].0.is_none());
        assert_eq!(blocks[1].2, L2);
    }

    #[test]
    fn inclination_columns() {
        assert_eq!(inclination_from_line2(L2).unwrap(), 51.6386);
        assert!(inclination_from_line2("2 25544").is_err());
    }

    #[test]
    fn omm_numbers_may_be_strings() {
        let record = json!({ "INCLINATION": "98.7204", "OTHER": 51.5, "NAME": 3 });
        let record = record.as_object().unwrap();
        assert_eq!(omm_f64(record, "INCLINATION").unwrap(), 98.7204);
        assert_eq!(omm_f64(record, "OTHER").unwrap(), 51.5);
        assert!(matches!(omm_f64(record, "MISSING"), Err(ElementSetError::MissingField(_))));
        assert!(matches!(omm_str(record, "NAME"), Err(ElementSetError::InvalidField(_))));
    }
}
