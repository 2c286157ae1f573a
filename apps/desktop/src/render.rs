//! Plain-text rendering of catalog data for the terminal.

use std::fmt::Write as _;

use client_core::CategoryGroup;
use shared::domain::Product;

/// Whole-peso price with `.` thousands separators, e.g. `$50.000`.
pub fn format_price(price: f64) -> String {
    let rounded = price.round().max(0.0) as u64;
    let digits = rounded.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push('$');
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

pub fn product_line(product: &Product) -> String {
    format!(
        "#{:<4} {:<28} {:>12}",
        product.id,
        product.name,
        format_price(product.price)
    )
}

pub fn product_list(products: &[Product]) -> String {
    let mut out = String::new();
    for product in products {
        let _ = writeln!(out, "{}", product_line(product));
    }
    out
}

pub fn category_groups(groups: &[CategoryGroup]) -> String {
    let mut out = String::new();
    for group in groups {
        let _ = writeln!(out, "{} ({})", group.category, group.products.len());
        for product in &group.products {
            let _ = writeln!(out, "  {}", product_line(product));
        }
    }
    out
}

pub fn product_detail(product: &Product) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", product.name);
    let _ = writeln!(out, "  id:       {}", product.id);
    let _ = writeln!(out, "  price:    {}", format_price(product.price));
    let _ = writeln!(out, "  category: {}", product.category);
    let _ = writeln!(out, "  image:    {}", product.image);
    let _ = writeln!(out, "  {}", product.description);
    out
}
