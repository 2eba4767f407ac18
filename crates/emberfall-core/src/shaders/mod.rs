/// Hand warp overlay shader (full-screen quad + warp/composite fragment)
pub fn hand_fx() -> &'static str {
    include_str!("hand_fx.wgsl")
}

/// Textured full-screen quad, used to stack the particle layer and overlay
pub fn composite() -> &'static str {
    include_str!("composite.wgsl")
}
