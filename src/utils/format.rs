/// Formats a VND price with Vietnamese digit grouping: `129900` -> `"129.900đ"`.
pub fn format_price(price: i64) -> String {
    let digits = price.abs().to_string();
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3 + 2);

    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (len - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    if price < 0 {
        format!("-{}đ", grouped)
    } else {
        format!("{}đ", grouped)
    }
}
