use std::env;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// IEC 61966-2-1: gamma-encoded sRGB to linear light
fn srgb_to_linear_exact(srgb: f64) -> f64 {
    if srgb <= 0.04045 {
        srgb / 12.92
    } else {
        ((srgb + 0.055) / 1.055).powf(2.4)
    }
}

fn write_table(
    file: &mut File,
    doc: &str,
    name: &str,
    len: usize,
    f: impl Fn(usize) -> f64,
) -> io::Result<()> {
    writeln!(file, "/// {doc}")?;
    writeln!(file, "pub static {name}: [f32; {len}] = [")?;
    for i in 0..len {
        if i > 0 && i % 8 == 0 {
            writeln!(file)?;
        }
        write!(file, "    {:.9},", f(i) as f32)?;
    }
    writeln!(file, "\n];\n")
}

fn main() -> io::Result<()> {
    let out_dir = env::var("OUT_DIR").expect("cargo sets OUT_DIR for build scripts");
    let dest_path = Path::new(&out_dir).join("gamma_lut.rs");
    let mut file = File::create(&dest_path)?;

    write_table(
        &mut file,
        "8-bit sRGB code value to linear",
        "SRGB8_TO_LINEAR",
        256,
        |i| srgb_to_linear_exact(i as f64 / 255.0),
    )?;

    println!("cargo::rerun-if-changed=build.rs");
    Ok(())
}
