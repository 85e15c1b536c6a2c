use std::{io::Write, path::{Path, PathBuf}};

use anyhow::{Result, anyhow, bail};
use clap::Parser as ClapParser;
use htmlfrag::{builder::HtmlBuilder,
               config::{Config, Setup},
               json,
               AttributeMap, HtmlString};

#[derive(clap::Parser, Debug)]
/// Render HTML fragments from JSON input.
struct Args {
    /// Action, one of "ul", "ol", "dl" (list from --input),
    /// "attributes" (attribute string from --input), "component" or
    /// "call" (NAME with arguments from --input), "link", "mailto"
    /// (to NAME, with --title), "entities", "decode", "email"
    /// (applied to NAME).
    #[clap(required(true))]
    action: String,

    /// Component or macro name, URL, address or text, depending on
    /// the action
    name: Option<String>,

    /// JSON file with the list, attributes or arguments; "-" for stdin
    #[clap(long)]
    input: Option<PathBuf>,

    /// JSON file with attributes for the outer element
    #[clap(long)]
    attributes: Option<PathBuf>,

    /// Setup file declaring components, routes and views
    #[clap(long)]
    setup: Option<PathBuf>,

    /// Link title
    #[clap(long)]
    title: Option<String>,

    /// Do not escape the link title
    #[clap(long)]
    raw: bool,
}

fn read_json(path: &Path) -> Result<serde_json::Value> {
    if path == Path::new("-") {
        Ok(serde_json::from_reader(std::io::stdin().lock())?)
    } else {
        let file = std::fs::File::open(path).map_err(
            |e| anyhow!("opening {:?} for reading: {}", path, e))?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }
}

impl Args {
    fn input(&self) -> Result<serde_json::Value> {
        let path = self.input.as_ref().ok_or_else(
            || anyhow!("action {:?} needs --input option", self.action))?;
        read_json(path)
    }

    fn name(&self) -> Result<&str> {
        self.name.as_deref().ok_or_else(
            || anyhow!("action {:?} needs a NAME argument", self.action))
    }

    fn attributes(&self) -> Result<AttributeMap> {
        match &self.attributes {
            Some(path) => json::attribute_map(&read_json(path)?),
            None => Ok(AttributeMap::new()),
        }
    }
}

fn run(args: &Args, builder: &HtmlBuilder) -> Result<String> {
    let html: HtmlString = match &*args.action {
        "ul" => builder.ul(&json::list_input(&args.input()?)?, &args.attributes()?),
        "ol" => builder.ol(&json::list_input(&args.input()?)?, &args.attributes()?),
        "dl" => builder.dl(&json::description_list(&args.input()?)?, &args.attributes()?),
        "attributes" => return Ok(builder.attributes(&json::attribute_map(&args.input()?)?)),
        "component" | "call" => {
            let arguments = match &args.input {
                Some(path) => json::arguments(&read_json(path)?),
                None => Vec::new(),
            };
            if args.action == "component" {
                builder.render_component(args.name()?, &arguments)?
            } else {
                builder.call(args.name()?, &arguments)?
            }
        }
        "link" => builder.link(args.name()?, args.title.as_deref(), args.attributes()?,
                               None, !args.raw)?,
        "mailto" => builder.mailto(args.name()?, args.title.as_deref(), args.attributes()?,
                                   !args.raw),
        "entities" => return Ok(builder.entities(args.name()?)),
        "decode" => return Ok(builder.decode(args.name()?)),
        "email" => return Ok(builder.email(args.name()?)),
        _ => bail!("unknown action {:?}", args.action),
    };
    Ok(html.into_string())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::from_env()?;
    config.apply();

    let setup = match &args.setup {
        Some(path) => Setup::load(path)?,
        None => Setup::default(),
    };
    let builder = setup.builder(&config)?;

    let out = run(&args, &builder)?;
    let mut outp = std::io::stdout().lock();
    writeln!(&mut outp, "{out}")?;
    outp.flush()?;
    Ok(())
}
