use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Invalid selection '{token}': expected a number, a range like 3-7, or 'all'")]
    Syntax { token: String },

    #[error("Selection '{token}' is out of range: pick between 1 and {max}")]
    OutOfRange { token: String, max: usize },
}

/// Playlist positions picked by the user, 1-based.
///
/// Positions are distinct and keep the order in which they were first
/// mentioned; a range contributes its positions in ascending order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection(Vec<usize>);

impl Selection {
    /// Parse a selection such as `"1-5,10,15-20"` against a playlist of
    /// `item_count` entries.
    ///
    /// An empty input or the keyword `all` selects every entry. Either the
    /// whole input is accepted or nothing is.
    ///
    /// # Examples
    /// ```
    /// # use video_primitives::{Selection, SelectionError};
    /// let selection = Selection::parse("3, 1-4", 10)?;
    /// assert_eq!(selection.indices(), &[3, 1, 2, 4]);
    /// # Ok::<(), SelectionError>(())
    /// ```
    pub fn parse(input: &str, item_count: usize) -> Result<Self, SelectionError> {
        if input.trim().is_empty() {
            return Ok(Self::all(item_count));
        }

        let mut builder = Builder::default();
        for token in input.split(',').map(str::trim) {
            match parse_token(token, item_count)? {
                Token::All => builder.extend(1..=item_count),
                Token::Single(index) => builder.push(index),
                Token::Range(start, end) => builder.extend(start..=end),
            }
        }
        Ok(Selection(builder.indices))
    }

    /// Every position from 1 to `item_count`
    pub fn all(item_count: usize) -> Self {
        Selection((1..=item_count).collect())
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    pub fn into_vec(self) -> Vec<usize> {
        self.0
    }
}

impl IntoIterator for Selection {
    type Item = usize;
    type IntoIter = std::vec::IntoIter<usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for index in &self.0 {
            if !first {
                f.write_str(",")?;
            }
            write!(f, "{}", index)?;
            first = false;
        }
        Ok(())
    }
}

#[derive(Default)]
struct Builder {
    indices: Vec<usize>,
    seen: HashSet<usize>,
}

impl Builder {
    fn push(&mut self, index: usize) {
        if self.seen.insert(index) {
            self.indices.push(index);
        }
    }

    fn extend(&mut self, indices: impl IntoIterator<Item = usize>) {
        for index in indices {
            self.push(index);
        }
    }
}

enum Token {
    All,
    Single(usize),
    Range(usize, usize),
}

fn parse_token(token: &str, item_count: usize) -> Result<Token, SelectionError> {
    if token.eq_ignore_ascii_case("all") {
        return Ok(Token::All);
    }

    match token.split_once('-') {
        None => {
            let index = parse_index(token, token, item_count)?;
            Ok(Token::Single(index))
        }
        Some((start, end)) => {
            let (start, end) = (start.trim(), end.trim());
            // Check both ends are well formed before looking at bounds
            let start_value = parse_number(start, token)?;
            let end_value = parse_number(end, token)?;
            if let (Some(first), Some(last)) = (start_value, end_value) {
                if first > last {
                    return Err(syntax(token));
                }
            }
            let start = check_bounds(start_value, token, item_count)?;
            let end = check_bounds(end_value, token, item_count)?;
            Ok(Token::Range(start, end))
        }
    }
}

fn parse_index(text: &str, token: &str, item_count: usize) -> Result<usize, SelectionError> {
    let value = parse_number(text, token)?;
    check_bounds(value, token, item_count)
}

/// Digits only. `None` means the digits did not fit in a `usize`.
fn parse_number(text: &str, token: &str) -> Result<Option<usize>, SelectionError> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(syntax(token));
    }
    Ok(text.parse().ok())
}

fn check_bounds(
    value: Option<usize>,
    token: &str,
    item_count: usize,
) -> Result<usize, SelectionError> {
    match value {
        Some(index) if (1..=item_count).contains(&index) => Ok(index),
        _ => Err(SelectionError::OutOfRange {
            token: token.to_string(),
            max: item_count,
        }),
    }
}

fn syntax(token: &str) -> SelectionError {
    SelectionError::Syntax {
        token: token.to_string(),
    }
}
