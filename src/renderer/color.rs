/// Speed color stops: ink black -> deep teal -> cyan -> pale -> white.
pub(crate) const SPEED_STOPS: [(f64, f64, f64); 5] = [
    (8.0, 8.0, 14.0),      // #08080e ink          (0.00)
    (16.0, 64.0, 96.0),    // #104060 deep teal    (0.25)
    (40.0, 170.0, 200.0),  // #28aac8 cyan         (0.50)
    (190.0, 235.0, 240.0), // #beebf0 pale         (0.75)
    (255.0, 255.0, 255.0), // #ffffff white        (1.00)
];

/// Convert a [0.0, 1.0] value to RGBA using the speed palette.
pub fn speed_to_rgba(t: f64) -> [u8; 4] {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let seg = t * 4.0;
    let i = (seg as usize).min(3);
    let s = seg - i as f64;

    let (r0, g0, b0) = SPEED_STOPS[i];
    let (r1, g1, b1) = SPEED_STOPS[i + 1];

    [
        (r0 + s * (r1 - r0)) as u8,
        (g0 + s * (g1 - g0)) as u8,
        (b0 + s * (b1 - b0)) as u8,
        255,
    ]
}

/// Tone-map unbounded dye amounts to RGBA: `1 - exp(-d * exposure)` per channel.
pub fn dye_to_rgba(rgb: [f64; 3], exposure: f64) -> [u8; 4] {
    let map = |d: f64| {
        let d = if d.is_finite() { d.max(0.0) } else { 0.0 };
        ((1.0 - (-d * exposure).exp()) * 255.0) as u8
    };
    [map(rgb[0]), map(rgb[1]), map(rgb[2]), 255]
}
