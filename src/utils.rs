use rand::Rng;

/// Formats a number with its ordinal indicator: 1st, 2nd, 3rd, 4th, ...
pub fn nth(num: usize) -> String {
    if (4..21).contains(&num) {
        // 11-13 are exceptions to the digit rules
        return format!("{}th", num);
    }
    match num % 10 {
        1 => format!("{}st", num),
        2 => format!("{}nd", num),
        3 => format!("{}rd", num),
        _ => format!("{}th", num),
    }
}

/// Removes and returns a random element.
/// The illegal element is skipped over unless it is the only element left.
pub fn pop_random<T: PartialEq>(xs: &mut Vec<T>, illegal: Option<&T>, rng: &mut impl Rng) -> T {
    let mut i = rng.gen_range(0..xs.len());
    if let Some(illegal) = illegal {
        if xs.len() > 1 && xs[i] == *illegal {
            i = (i + 1) % xs.len();
        }
    }
    xs.remove(i)
}
