extern crate argparse;
extern crate itbrowz;
use argparse::{ArgumentParser, Store, StoreOption, StoreTrue};
use std::io;
use std::process::Command;

use itbrowz::config::Config;
use itbrowz::image::CommandViewer;
use itbrowz::render::Decorator;

/// Fetch images with `curl`, which is usually to hand where `imgcat` is.
fn curl(url: &str) -> io::Result<Vec<u8>> {
    let output = Command::new("curl").args(["-sfL", url]).output()?;
    if output.status.success() {
        Ok(output.stdout)
    } else {
        Err(io::Error::new(
            io::ErrorKind::Other,
            format!("curl exited with {}", output.status),
        ))
    }
}

fn configure<D: Decorator>(
    mut conf: Config<D>,
    width: Option<usize>,
    div: &Option<String>,
    imgcat: bool,
) -> Config<D> {
    if let Some(width) = width {
        conf = conf.width(width);
    }
    if let Some(div) = div {
        conf = conf.root(div);
    }
    if imgcat {
        conf = conf.image_fetcher(curl).image_viewer(CommandViewer::default());
    }
    conf
}

fn translate<R>(
    input: R,
    base_url: &str,
    width: Option<usize>,
    div: &Option<String>,
    plain: bool,
    imgcat: bool,
) -> itbrowz::Result<()>
where
    R: io::Read,
{
    let out = io::stdout().lock();
    #[cfg(unix)]
    {
        if !plain {
            return configure(itbrowz::config::ansi(), width, div, imgcat)
                .render_from_read(input, base_url, out);
        }
    }
    #[cfg(not(unix))]
    let _ = plain;
    configure(itbrowz::config::plain(), width, div, imgcat).render_from_read(input, base_url, out)
}

fn main() {
    env_logger::init();

    let mut infile: Option<String> = None;
    let mut width: Option<usize> = None;
    let mut base_url = String::from("https://localhost/");
    let mut div: Option<String> = None;
    let mut plain = false;
    let mut imgcat = false;

    {
        let mut ap = ArgumentParser::new();
        ap.refer(&mut infile).add_argument(
            "infile",
            StoreOption,
            "Input HTML file (default is standard input)",
        );
        ap.refer(&mut width).add_option(
            &["-w", "--width"],
            StoreOption,
            "Terminal width (default is the size of the terminal)",
        );
        ap.refer(&mut base_url).add_option(
            &["-b", "--base-url"],
            Store,
            "URL the page came from, for resolving links",
        );
        ap.refer(&mut div).add_option(
            &["-d", "--div"],
            StoreOption,
            "Only render the top level <div> with this class or id",
        );
        ap.refer(&mut plain)
            .add_option(&["--plain"], StoreTrue, "Don't use ANSI terminal colours");
        ap.refer(&mut imgcat).add_option(
            &["--imgcat"],
            StoreTrue,
            "Fetch images with curl and show them with imgcat",
        );
        ap.parse_args_or_exit();
    }

    let result = match infile {
        None => {
            let stdin = io::stdin();
            translate(stdin.lock(), &base_url, width, &div, plain, imgcat)
        }
        Some(name) => match std::fs::File::open(&name) {
            Ok(file) => translate(file, &base_url, width, &div, plain, imgcat),
            Err(e) => {
                eprintln!("{}: {}", name, e);
                std::process::exit(1);
            }
        },
    };
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
