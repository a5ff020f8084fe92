// the collection of utility functions mainly for bracket parsing and proceeding

/// true when every '(' has its ')' and no ')' comes first
pub fn brackets_balanced(s: &str) -> bool {
    let mut depth: i32 = 0;
    for c in s.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

// code finds the position of the bracket closing the one at bracket_start
pub fn find_pair_to_this_bracket(input: &str, bracket_start: usize) -> Option<usize> {
    let mut stack = 0;
    for (i, c) in input.char_indices().skip_while(|(i, _)| *i < bracket_start) {
        if c == '(' {
            stack += 1;
        } else if c == ')' {
            stack -= 1;
            if stack == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// for `name(argument)` returns `(name, argument)`; the bracket opened after the name
/// has to be closed by the last char of the input
pub fn split_function_call(input: &str) -> Option<(&str, &str)> {
    let bracket_start = input.find('(')?;
    let bracket_end = find_pair_to_this_bracket(input, bracket_start)?;
    if bracket_end + 1 != input.len() {
        return None;
    }
    Some((&input[..bracket_start], &input[bracket_start + 1..bracket_end]))
}

/// values start, start + step, ... strictly below end
pub fn arange(start: f64, end: f64, step: f64) -> Vec<f64> {
    if !(step > 0.0) || !(end > start) {
        return Vec::new();
    }
    let num_values = ((end - start) / step).ceil() as usize;
    (0..num_values)
        .map(|i| start + i as f64 * step)
        .filter(|value| *value < end)
        .collect()
}
