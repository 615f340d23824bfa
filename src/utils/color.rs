//! CSS color strings to terminal escape sequences.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorDepth {
    Truecolor,
    X256,
    X16,
    /// No escape sequences at all.
    Plain,
}

/// Detect terminal color depth from environment.
/// Priority: NO_COLOR -> CHATSKIN_COLOR override -> COLORTERM truecolor/24bit -> TERM *256color -> 16.
pub fn detect_color_depth() -> ColorDepth {
    if std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
        return ColorDepth::Plain;
    }
    if let Ok(force) = std::env::var("CHATSKIN_COLOR") {
        match force.trim().to_ascii_lowercase().as_str() {
            "truecolor" | "24bit" | "24-bit" => return ColorDepth::Truecolor,
            "256" | "x256" | "256color" => return ColorDepth::X256,
            "16" | "ansi" | "x16" => return ColorDepth::X16,
            "none" | "plain" | "off" => return ColorDepth::Plain,
            _ => {}
        }
    }

    if let Ok(colorterm) = std::env::var("COLORTERM") {
        let s = colorterm.to_ascii_lowercase();
        if s.contains("truecolor") || s.contains("24bit") || s.contains("24-bit") {
            return ColorDepth::Truecolor;
        }
    }
    if let Ok(term) = std::env::var("TERM") {
        if term.to_ascii_lowercase().contains("256color") {
            return ColorDepth::X256;
        }
    }
    ColorDepth::X16
}

/// Parse `#rgb`, `#rrggbb`, `rgb(r, g, b)` or a handful of names.
pub fn parse_color(s: &str) -> Option<Rgb> {
    let lower = s.trim().to_ascii_lowercase();
    if let Some(c) = parse_hex_color(&lower) {
        return Some(c);
    }
    if let Some(c) = parse_rgb_func(&lower) {
        return Some(c);
    }
    match lower.as_str() {
        "black" => Some(Rgb(0, 0, 0)),
        "white" => Some(Rgb(255, 255, 255)),
        "gray" | "grey" => Some(Rgb(128, 128, 128)),
        "red" => Some(Rgb(255, 0, 0)),
        "green" => Some(Rgb(0, 128, 0)),
        "blue" => Some(Rgb(0, 0, 255)),
        _ => None,
    }
}

fn parse_hex_color(s: &str) -> Option<Rgb> {
    let hex = s.strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 => {
            let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
            Some(Rgb(r, g, b))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Rgb(r, g, b))
        }
        _ => None,
    }
}

fn parse_rgb_func(s: &str) -> Option<Rgb> {
    let content = s.strip_prefix("rgb(")?.strip_suffix(')')?;
    let parts: Vec<_> = content
        .split([',', ' '])
        .filter(|t| !t.is_empty())
        .collect();
    if parts.len() != 3 {
        return None;
    }
    let r = parts[0].parse::<u16>().ok()?;
    let g = parts[1].parse::<u16>().ok()?;
    let b = parts[2].parse::<u16>().ok()?;
    Some(Rgb(r.min(255) as u8, g.min(255) as u8, b.min(255) as u8))
}

/// Wrap `text` in SGR sequences for the given foreground and optional
/// background. Unparseable colors are left out.
pub fn paint(text: &str, fg: &str, bg: Option<&str>, depth: ColorDepth) -> String {
    if depth == ColorDepth::Plain {
        return text.to_string();
    }
    let mut codes = Vec::new();
    if let Some(rgb) = parse_color(fg) {
        codes.push(sgr(rgb, depth, false));
    }
    if let Some(rgb) = bg.and_then(parse_color) {
        codes.push(sgr(rgb, depth, true));
    }
    if codes.is_empty() {
        return text.to_string();
    }
    format!("\x1b[{}m{}\x1b[0m", codes.join(";"), text)
}

fn sgr(Rgb(r, g, b): Rgb, depth: ColorDepth, background: bool) -> String {
    match depth {
        ColorDepth::Truecolor => {
            let lead = if background { 48 } else { 38 };
            format!("{lead};2;{r};{g};{b}")
        }
        ColorDepth::X256 => {
            let lead = if background { 48 } else { 38 };
            format!("{lead};5;{}", rgb_to_xterm256(r, g, b))
        }
        ColorDepth::X16 | ColorDepth::Plain => {
            let index = nearest_ansi16_from_rgb(r, g, b);
            let base = match (background, index < 8) {
                (false, true) => 30,
                (false, false) => 90 - 8,
                (true, true) => 40,
                (true, false) => 100 - 8,
            };
            (base + index as u16).to_string()
        }
    }
}

fn nearest_ansi16_from_rgb(r: u8, g: u8, b: u8) -> u8 {
    // 0..7 standard, 8..15 bright
    const ANSI16: &[(u8, u8, u8); 16] = &[
        (0, 0, 0),
        (205, 0, 0),
        (0, 205, 0),
        (205, 205, 0),
        (0, 0, 205),
        (205, 0, 205),
        (0, 205, 205),
        (192, 192, 192),
        (128, 128, 128),
        (255, 0, 0),
        (0, 255, 0),
        (255, 255, 0),
        (92, 92, 255),
        (255, 0, 255),
        (0, 255, 255),
        (255, 255, 255),
    ];

    let mut best = 0usize;
    let mut best_dist = u32::MAX;
    for (i, &(rr, gg, bb)) in ANSI16.iter().enumerate() {
        let dist = color_dist_sq(r, g, b, rr, gg, bb);
        if dist < best_dist {
            best_dist = dist;
            best = i;
        }
    }
    best as u8
}

fn rgb_to_xterm256(r: u8, g: u8, b: u8) -> u8 {
    // Nearest of the 6x6x6 cube and the grayscale ramp
    let cube_index = rgb_to_xterm_cube_index(r, g, b);
    let (cr, cg, cb) = xterm256_to_rgb(cube_index);
    let cube_dist = color_dist_sq(r, g, b, cr, cg, cb);

    let gray_index = rgb_to_xterm_gray_index(r, g, b);
    let (gr, gg, gb) = xterm256_to_rgb(gray_index);
    let gray_dist = color_dist_sq(r, g, b, gr, gg, gb);

    if gray_dist < cube_dist {
        gray_index
    } else {
        cube_index
    }
}

fn rgb_to_xterm_cube_index(r: u8, g: u8, b: u8) -> u8 {
    fn map_comp(c: u8) -> u8 {
        if c < 48 {
            0
        } else if c < 114 {
            1
        } else {
            ((c - 35) / 40).min(5)
        }
    }
    16 + 36 * map_comp(r) + 6 * map_comp(g) + map_comp(b)
}

fn rgb_to_xterm_gray_index(r: u8, g: u8, b: u8) -> u8 {
    let avg = (r as u16 + g as u16 + b as u16) / 3;
    let idx = if avg <= 3 {
        16
    } else {
        (avg.saturating_sub(8) / 10) as u8
    };
    232 + idx.min(23)
}

fn color_dist_sq(r1: u8, g1: u8, b1: u8, r2: u8, g2: u8, b2: u8) -> u32 {
    let dr = r1 as i32 - r2 as i32;
    let dg = g1 as i32 - g2 as i32;
    let db = b1 as i32 - b2 as i32;
    (dr * dr + dg * dg + db * db) as u32
}

fn xterm_cube_comp(i: u8) -> u8 {
    if i == 0 {
        0
    } else {
        55 + 40 * i
    }
}

fn xterm256_to_rgb(i: u8) -> (u8, u8, u8) {
    match i {
        0..=15 => (0, 0, 0),
        16..=231 => {
            let mut n = i - 16;
            let r = n / 36;
            n %= 36;
            let g = n / 6;
            n %= 6;
            (xterm_cube_comp(r), xterm_cube_comp(g), xterm_cube_comp(n))
        }
        232..=255 => {
            let v = 8 + 10 * (i - 232);
            (v, v, v)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_and_rgb() {
        assert_eq!(parse_color("#2563EB"), Some(Rgb(0x25, 0x63, 0xeb)));
        assert_eq!(parse_color(" #fff "), Some(Rgb(255, 255, 255)));
        assert_eq!(parse_color("rgb(300, 0, 12)"), Some(Rgb(255, 0, 12)));
        assert_eq!(parse_color("White"), Some(Rgb(255, 255, 255)));
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("tomato-ish"), None);
    }

    #[test]
    fn paints_truecolor() {
        assert_eq!(
            paint("hi", "#ff0000", Some("#000"), ColorDepth::Truecolor),
            "\x1b[38;2;255;0;0;48;2;0;0;0mhi\x1b[0m"
        );
    }

    #[test]
    fn unparseable_colors_leave_text_plain() {
        assert_eq!(paint("hi", "nope", None, ColorDepth::Truecolor), "hi");
    }

    #[test]
    fn plain_depth_emits_no_escapes() {
        assert_eq!(paint("hi", "#ff0000", Some("#000"), ColorDepth::Plain), "hi");
    }

    #[test]
    fn quantizes_to_ansi16() {
        assert_eq!(nearest_ansi16_from_rgb(250, 10, 10), 9);
        assert_eq!(sgr(Rgb(250, 10, 10), ColorDepth::X16, false), "91");
        assert_eq!(sgr(Rgb(0, 0, 0), ColorDepth::X16, true), "40");
    }

    #[test]
    fn quantizes_to_256_index() {
        let idx = rgb_to_xterm256(255, 0, 0);
        assert!((16..=231).contains(&idx));
        assert_eq!(rgb_to_xterm256(128, 128, 128), 244);
    }
}
