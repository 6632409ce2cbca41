use glam::Vec3;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Write one frame as an ASCII PLY point cloud declaring only float x, y, z
/// properties. The file is `<dir>/<prefix><frame:06>.ply`; returns the path.
pub fn write_frame(dir: &Path, prefix: &str, frame: u32, positions: &[Vec3]) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{prefix}{frame:06}.ply"));
    let mut w = BufWriter::new(fs::File::create(&path)?);
    writeln!(w, "ply")?;
    writeln!(w, "format ascii 1.0")?;
    writeln!(w, "element vertex {}", positions.len())?;
    writeln!(w, "property float x")?;
    writeln!(w, "property float y")?;
    writeln!(w, "property float z")?;
    writeln!(w, "end_header")?;
    for p in positions {
        writeln!(w, "{} {} {}", p.x, p.y, p.z)?;
    }
    w.flush()?;
    Ok(path)
}
