//! HTML rendering.
//!
//! Every interpolated value goes through [`escape_html`].

use alloy::primitives::{Address, TxHash, U256};
use axum::response::Html;

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Insert thousands separators into a decimal number.
pub fn format_num(value: impl std::fmt::Display) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Whole coins in `base_units`, with thousands separators.
pub fn format_coins(base_units: U256, unit_scale: u64) -> String {
    format_num(base_units / U256::from(unit_scale.max(1)))
}

fn page(title: &str, nav: bool, body: &str) -> Html<String> {
    let nav = if nav {
        r#"<nav><a href="/">Balance</a> | <a href="/transfer">Transfer</a> | <a href="/mint">Mint</a> | <a href="/events">Events</a> | <a href="/logout">Logout</a></nav>"#
    } else {
        ""
    };
    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title} - Wallet</title>
<link rel="stylesheet" href="/css/style.css">
</head>
<body>
{nav}
<main>
<h1>{title}</h1>
{body}
</main>
</body>
</html>
"#,
        title = escape_html(title),
        nav = nav,
        body = body,
    ))
}

fn message(text: &str) -> String {
    format!(r#"<p class="message">{}</p>"#, escape_html(text))
}

pub fn login_page(error: Option<&str>) -> Html<String> {
    let error = error.map(message).unwrap_or_default();
    page(
        "Login",
        false,
        &format!(
            r#"{error}<form method="post" action="/login">
<label for="mnemonic">Mnemonic</label>
<textarea id="mnemonic" name="mnemonic" rows="3" autocomplete="off"></textarea>
<button type="submit">Login</button>
</form>"#
        ),
    )
}

pub fn balance_page(
    address: Address,
    sequence_number: u64,
    balance: U256,
    unit_scale: u64,
) -> Html<String> {
    page(
        "Balance",
        true,
        &format!(
            r#"<dl>
<dt>Address</dt><dd class="address">{address}</dd>
<dt>Balance</dt><dd class="balance">{coins} coins ({units} base units)</dd>
<dt>Sequence number</dt><dd class="sequence">{sequence}</dd>
</dl>"#,
            address = escape_html(&address.to_string()),
            coins = format_coins(balance, unit_scale),
            units = format_num(balance),
            sequence = format_num(sequence_number),
        ),
    )
}

pub fn transfer_page(address: Address) -> Html<String> {
    page(
        "Transfer",
        true,
        &format!(
            r#"<p>From <span class="address">{address}</span></p>
<form method="post" action="/transfer">
<label>To <input name="transferTo" required></label>
<label>Amount <input name="numberOfCoins" inputmode="numeric" required></label>
<label>Gas unit price <input name="gas_unit_price" inputmode="numeric" value="1"></label>
<label>Max gas amount <input name="max_gas_amount" inputmode="numeric" value="21000"></label>
<button type="submit">Transfer</button>
</form>"#,
            address = escape_html(&address.to_string()),
        ),
    )
}

pub fn transfer_result_page(text: &str, tx_hash: Option<TxHash>) -> Html<String> {
    let tx = tx_hash
        .map(|hash| {
            format!(
                r#"<p>Transaction <code>{}</code></p>"#,
                escape_html(&hash.to_string())
            )
        })
        .unwrap_or_default();
    page(
        "Transfer",
        true,
        &format!(r#"{}{}<p><a href="/transfer">Back</a></p>"#, message(text), tx),
    )
}

pub fn mint_page(address: Address) -> Html<String> {
    page(
        "Mint",
        true,
        &format!(
            r#"<form method="post" action="/mint">
<label>To <input name="transferTo" placeholder="{address}"></label>
<label>Coins <input name="numberOfCoins" inputmode="numeric" required></label>
<button type="submit">Mint</button>
</form>"#,
            address = escape_html(&address.to_string()),
        ),
    )
}

pub fn events_page(address: Address) -> Html<String> {
    page(
        "Events",
        true,
        &format!(
            r#"<p>No events for <span class="address">{}</span> yet.</p>"#,
            escape_html(&address.to_string())
        ),
    )
}

pub fn error_page(text: &str) -> Html<String> {
    page("Error", true, &message(text))
}
