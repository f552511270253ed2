use crate::model::RowFields;

/// Tokens a row needs so that every fixed column is filled: the item number
/// plus the seven trailing columns.
pub(crate) const REQUIRED_TOKENS: usize = 8;

/// Takes the first whitespace-separated token. The remainder is rejoined
/// with single spaces; a blank line yields an empty token.
pub(crate) fn pop_first(line: &str) -> (String, String) {
    let mut tokens = line.split_whitespace();
    let first = tokens.next().unwrap_or_default().to_string();
    (first, tokens.collect::<Vec<_>>().join(" "))
}

/// Takes the last whitespace-separated token, see [`pop_first`].
pub(crate) fn pop_last(line: &str) -> (String, String) {
    let mut tokens = line.split_whitespace().collect::<Vec<_>>();
    let last = tokens.pop().unwrap_or_default().to_string();
    (last, tokens.join(" "))
}

/// Splits a normalized row into its columns.
///
/// The item number is taken from the front, the fixed columns from the back
/// (plant, CPV, value, price, quantity, unit, symbol) and whatever is left in
/// the middle is the free-text item name. Short rows leave the columns that
/// ran out of tokens empty.
pub(crate) fn tokenize_line(line: &str) -> RowFields {
    let (lp, rest) = pop_first(line);
    let (plant, rest) = pop_last(&rest);
    let (cpv, rest) = pop_last(&rest);
    let (value, rest) = pop_last(&rest);
    let (price, rest) = pop_last(&rest);
    let (quantity, rest) = pop_last(&rest);
    let (unit, rest) = pop_last(&rest);
    let (symbol, name) = pop_last(&rest);

    RowFields {
        lp,
        plant,
        cpv,
        name,
        symbol,
        unit,
        quantity,
        price,
        value,
    }
}
