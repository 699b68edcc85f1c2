use sovran_variant::{TypeTraits, Variant};
use std::error::Error;
use std::ffi::c_void;
use std::fmt;
use std::io::{self, Write};
use tracing::Level;

#[derive(Clone)]
struct Text {
    str: String,
}

impl Text {
    fn new(s: &str) -> Self {
        Self { str: s.to_string() }
    }
}

impl TypeTraits for Text {
    const IS_CLASS: bool = true;

    fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.str)
    }
}

#[derive(Clone, Copy)]
struct Point {
    x: i32,
    y: i32,
}

impl TypeTraits for Point {
    const IS_POD: bool = true;
    const IS_CLASS: bool = true;

    fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {}}}", self.x, self.y)
    }
}

struct CastTable<'a, W: Write> {
    out: &'a mut W,
    index: usize,
    failed: usize,
}

impl<W: Write> CastTable<'_, W> {
    /// Attempts `get::<U>()` and reports whether the outcome was the expected one.
    fn run<U: TypeTraits>(&mut self, item: &Variant, expected: bool) -> io::Result<()> {
        let name = item.type_name().unwrap_or_default();
        let ok = item.get::<U>().is_ok();
        let matched = ok == expected;
        if !matched {
            self.failed += 1;
        }
        writeln!(
            self.out,
            "#{}: cast from \"{}\" to \"{}\" - \t\t{}",
            self.index,
            name,
            std::any::type_name::<U>(),
            matched
        )?;
        self.index += 1;
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_max_level(Level::TRACE)
        .with_writer(io::stderr)
        .init();

    let heap = Box::into_raw(Box::new(String::from("ptr to std::string")));

    let arr = vec![
        Variant::new('0'),
        Variant::new(31i32),
        Variant::new(32u32),
        Variant::new(33.48f64),
        Variant::new(String::from("std::string")),
        Variant::new(heap),
        Variant::new(Text::new("string")),
        Variant::new(Point { x: 1, y: 2 }),
    ];

    let stdout = io::stdout();
    let mut out = stdout.lock();

    for item in &arr {
        item.dump(&mut out)?;
        writeln!(out, "value                     : {}", item)?;
        writeln!(out)?;
    }

    let mut table = CastTable {
        out: &mut out,
        index: 0,
        failed: 0,
    };

    table.run::<char>(&arr[0], true)?;
    table.run::<i8>(&arr[0], false)?;
    table.run::<u8>(&arr[0], false)?;

    table.run::<i32>(&arr[1], true)?;
    table.run::<u32>(&arr[1], false)?;

    table.run::<i32>(&arr[2], false)?;
    table.run::<u32>(&arr[2], true)?;

    table.run::<i32>(&arr[3], false)?;
    table.run::<i64>(&arr[3], false)?;
    table.run::<f32>(&arr[3], false)?;
    table.run::<f64>(&arr[3], true)?;

    table.run::<&'static str>(&arr[4], false)?;
    table.run::<Vec<u8>>(&arr[4], false)?;
    table.run::<String>(&arr[4], true)?;
    table.run::<*mut String>(&arr[4], false)?;

    table.run::<*mut c_void>(&arr[5], true)?;
    table.run::<*mut u8>(&arr[5], true)?;
    table.run::<*mut String>(&arr[5], true)?;
    table.run::<String>(&arr[5], false)?;

    table.run::<i32>(&arr[6], false)?;
    table.run::<String>(&arr[6], false)?;
    table.run::<*mut Text>(&arr[6], false)?;
    table.run::<Text>(&arr[6], true)?;

    table.run::<Point>(&arr[7], true)?;
    table.run::<*const Point>(&arr[7], false)?;

    let failed = table.failed;
    drop(arr);
    // SAFETY: `heap` came from `Box::into_raw` and the variants holding it are gone
    unsafe { drop(Box::from_raw(heap)) };

    if failed > 0 {
        return Err(format!("{} casts did not behave as expected", failed).into());
    }
    Ok(())
}
