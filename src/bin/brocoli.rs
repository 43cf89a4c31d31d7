extern crate brocoli;
extern crate clap;
extern crate env_logger;
extern crate failure;
#[macro_use]
extern crate log;
extern crate num;
extern crate num_cpus;

use brocoli::{parse_gradient, Camera, Color, Coloration, FractalParameters, Size};
use clap::{App, Arg, ArgMatches};
use log::LevelFilter;
use num::Complex;
use std::str::FromStr;
use std::time::Instant;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}

/// `WxH`, or one of the usual screen names.
fn parse_size(s: &str) -> Option<Size> {
    let named = match s.to_uppercase().as_str() {
        "4K" => Some(Size(3840, 2160)),
        "QHD" => Some(Size(2560, 1440)),
        "FHD" | "1080P" => Some(Size(1920, 1080)),
        "720P" => Some(Size(1280, 720)),
        _ => None,
    };
    named.or_else(|| match parse_pair::<usize>(s, 'x') {
        Some((w, h)) if w > 0 && h > 0 => Some(Size(w, h)),
        _ => None,
    })
}

fn validate_with<T, F>(s: &str, parse: F, err: &str) -> Result<(), String>
where
    F: Fn(&str) -> Option<T>,
{
    match parse(s) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + PartialOrd>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

fn validate_number<T: FromStr>(s: &str, err: &str) -> Result<(), String> {
    T::from_str(s).map(|_| ()).map_err(|_| err.to_string())
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const CENTER: &str = "center";
const ZOOM: &str = "zoom";
const KIND: &str = "kind";
const LIMIT: &str = "limit";
const BOUND: &str = "bound";
const JULIA: &str = "julia";
const BINS: &str = "bins";
const QUANTILES: &str = "quantiles";
const POWER: &str = "power";
const GRADIENT: &str = "gradient";
const COLORS: &str = "colors";
const SPEED: &str = "speed";
const OFFSET: &str = "offset";
const INSIDE: &str = "inside";
const THREADS: &str = "threads";
const VERBOSE: &str = "verbose";
const DRY: &str = "dry";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("brocoli")
        .version("0.1.0")
        .author("The brocoli developers")
        .about("Escape time fractal renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required_unless(DRY)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file, its extension picks the format"),
        )
        .arg(
            Arg::with_name(SIZE)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("800x600")
                .validator(|s| {
                    validate_with(&s, parse_size, "Size must be WxH, 4K, QHD, FHD, 1080P or 720P")
                })
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(CENTER)
                .long(CENTER)
                .short("c")
                .takes_value(true)
                .default_value("-0.75,0")
                .allow_hyphen_values(true)
                .validator(|s| validate_with(&s, parse_complex, "Could not parse center"))
                .help("Center of the view on the complex plane, as re,im"),
        )
        .arg(
            Arg::with_name(ZOOM)
                .long(ZOOM)
                .short("z")
                .takes_value(true)
                .default_value("1")
                .validator(|s| {
                    validate_range(
                        &s,
                        std::f64::MIN_POSITIVE,
                        std::f64::MAX,
                        "Could not parse zoom",
                        "Zoom must be positive",
                    )
                })
                .help("Zoom factor, the view is 3 / zoom high"),
        )
        .arg(
            Arg::with_name(KIND)
                .long(KIND)
                .short("k")
                .takes_value(true)
                .default_value("s")
                .validator(|s| Coloration::from_str(&s).map(|_| ()))
                .help(
                    "Coloration: [T]ime, [S]mooth time, [A]ngle, triangle [I]nequality, \
                     [C]urvature",
                ),
        )
        .arg(
            Arg::with_name(LIMIT)
                .long(LIMIT)
                .short("l")
                .takes_value(true)
                .default_value("128")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        std::usize::MAX,
                        "Could not parse iteration limit",
                        "Iteration limit must be at least 1",
                    )
                })
                .help("Maximum number of iterations per point"),
        )
        .arg(
            Arg::with_name(BOUND)
                .long(BOUND)
                .short("b")
                .takes_value(true)
                .default_value("20000")
                .validator(|s| {
                    validate_range(
                        &s,
                        std::f64::MIN_POSITIVE,
                        std::f64::MAX,
                        "Could not parse escape bound",
                        "Escape bound must be positive",
                    )
                })
                .help("Escape radius"),
        )
        .arg(
            Arg::with_name(JULIA)
                .long(JULIA)
                .short("j")
                .takes_value(true)
                .allow_hyphen_values(true)
                .validator(|s| validate_with(&s, parse_complex, "Could not parse julia parameter"))
                .help("Draw the Julia set of this parameter, as re,im"),
        )
        .arg(
            Arg::with_name(BINS)
                .long(BINS)
                .takes_value(true)
                .default_value("1")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        std::usize::MAX,
                        "Could not parse bin count",
                        "Bin count must be at least 1",
                    )
                })
                .help("Spread the escape values into this many equally populated bins"),
        )
        .arg(
            Arg::with_name(QUANTILES)
                .long(QUANTILES)
                .short("q")
                .help("Replace escape values by their quantile rank"),
        )
        .arg(
            Arg::with_name(POWER)
                .long(POWER)
                .short("p")
                .takes_value(true)
                .default_value("1")
                .allow_hyphen_values(true)
                .validator(|s| validate_number::<f64>(&s, "Could not parse power"))
                .help("Raise escape values to this power, keeping their sign"),
        )
        .arg(
            Arg::with_name(GRADIENT)
                .long(GRADIENT)
                .short("g")
                .takes_value(true)
                .default_value("000000-ffffff")
                .validator(|s| match parse_gradient(&s) {
                    Ok(ref colors) if colors.len() >= 2 => Ok(()),
                    Ok(_) => Err("A gradient needs at least two colors".to_string()),
                    Err(e) => Err(e.to_string()),
                })
                .help("Dash separated colors, a trailing dash loops the gradient"),
        )
        .arg(
            Arg::with_name(COLORS)
                .long(COLORS)
                .short("n")
                .takes_value(true)
                .default_value("1000")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        std::usize::MAX,
                        "Could not parse color count",
                        "Color count must be at least 1",
                    )
                })
                .help("Number of colors in the gradient table"),
        )
        .arg(
            Arg::with_name(SPEED)
                .long(SPEED)
                .takes_value(true)
                .default_value("1")
                .allow_hyphen_values(true)
                .validator(|s| validate_number::<f64>(&s, "Could not parse gradient speed"))
                .help("How many times the gradient repeats"),
        )
        .arg(
            Arg::with_name(OFFSET)
                .long(OFFSET)
                .takes_value(true)
                .default_value("0")
                .allow_hyphen_values(true)
                .validator(|s| validate_number::<f64>(&s, "Could not parse gradient offset"))
                .help("Rotation of the gradient"),
        )
        .arg(
            Arg::with_name(INSIDE)
                .long(INSIDE)
                .short("i")
                .takes_value(true)
                .validator(|s| Color::from_str(&s).map(|_| ()).map_err(|e| e.to_string()))
                .help("Color of the points inside the set"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use in solver, one per CPU by default"),
        )
        .arg(
            Arg::with_name(VERBOSE)
                .long(VERBOSE)
                .short("v")
                .multiple(true)
                .help("More logging, up to -vvv"),
        )
        .arg(
            Arg::with_name(DRY)
                .long(DRY)
                .help("Print the parameters and exit without rendering"),
        )
        .get_matches()
}

fn init_logging(occurrences: u64) {
    let level = match occurrences {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new().filter_level(level).init();
}

fn value<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<T, failure::Error> {
    let raw = matches.value_of(name).unwrap_or_default();
    T::from_str(raw).map_err(|_| failure::err_msg(format!("Could not parse {} {:?}", name, raw)))
}

fn parameters(matches: &ArgMatches) -> Result<FractalParameters, failure::Error> {
    let size = parse_size(matches.value_of(SIZE).unwrap_or_default())
        .ok_or_else(|| failure::err_msg("Error parsing image dimensions"))?;
    let center = parse_complex(matches.value_of(CENTER).unwrap_or_default())
        .ok_or_else(|| failure::err_msg("Error parsing center"))?;
    let zoom: f64 = value(matches, ZOOM)?;
    let camera = Camera::new(size, center, 3.0 / zoom)?;

    let mut parameters = FractalParameters::new(camera);
    parameters.kind = Coloration::from_str(matches.value_of(KIND).unwrap_or_default())
        .map_err(failure::err_msg)?;
    parameters.limit = value(matches, LIMIT)?;
    parameters.bound = value(matches, BOUND)?;
    parameters.julia = match matches.value_of(JULIA) {
        Some(s) => Some(parse_complex(s).ok_or_else(|| failure::err_msg("Error parsing julia"))?),
        None => None,
    };
    parameters.bins = value(matches, BINS)?;
    parameters.normalize_quantiles = matches.is_present(QUANTILES);
    parameters.steps_power = value(matches, POWER)?;
    parameters.gradient = parse_gradient(matches.value_of(GRADIENT).unwrap_or_default())?;
    parameters.color_count = value(matches, COLORS)?;
    parameters.gradient_speed = value(matches, SPEED)?;
    parameters.gradient_offset = value(matches, OFFSET)?;
    parameters.inside_color = match matches.value_of(INSIDE) {
        Some(s) => Some(Color::from_str(s)?),
        None => None,
    };
    parameters.validate()?;
    Ok(parameters)
}

fn run(matches: &ArgMatches) -> Result<(), failure::Error> {
    let parameters = parameters(matches)?;
    if matches.is_present(DRY) {
        println!("{:#?}", parameters);
        return Ok(());
    }

    let threads = match matches.value_of(THREADS) {
        Some(_) => value(matches, THREADS)?,
        None => num_cpus::get(),
    };
    let output = matches
        .value_of(OUTPUT)
        .ok_or_else(|| failure::err_msg("No output file"))?;

    let started = Instant::now();
    let image = parameters.render(threads)?;
    info!(
        "rendered {}x{} in {:.3}s",
        image.width(),
        image.height(),
        started.elapsed().as_millis() as f64 / 1000.0
    );
    image.to_rgb_image().save(output)?;
    info!("wrote {}", output);
    Ok(())
}

fn main() {
    let matches = args();
    init_logging(matches.occurrences_of(VERBOSE));

    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        for cause in e.iter_causes() {
            eprintln!("  caused by: {}", cause);
        }
        std::process::exit(1);
    }
}
