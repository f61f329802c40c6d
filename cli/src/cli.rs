use clap::Parser;

#[derive(Parser, Debug)]
#[clap(name = "rlinda", version, about = "Talk with a Linda tuple space from the command line")]
pub struct Cli {
  /// IP address (or tcp:// endpoint) of the adapter hosting the tuple space
  #[clap(short, long, env = "IP", default_value = "127.0.0.1")]
  pub ip: String,

  #[clap(subcommand)]
  pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
  /// Insert a tuple into the Linda tuple space
  Out(DataArgs),
  /// Take the first matching tuple, blocking until one exists
  #[clap(name = "in")]
  In(PatternArgs),
  /// Take the first matching tuple if present now (non-blocking)
  Inp(DataArgs),
  /// Read the first matching tuple without removing it, blocking until one exists
  Rd(PatternArgs),
  /// Dump all tuples from the Linda tuple space
  Dump,
  /// Print every message seen on the bus as it arrives
  Monitor,
}

#[derive(Parser, Debug)]
pub struct DataArgs {
  /// Tuple or pattern literal, e.g. '[1, "hello"]' or '[1, *]'
  #[clap(short, long, default_value = "[]")]
  pub data: String,
}

#[derive(Parser, Debug)]
pub struct PatternArgs {
  /// Pattern literal, e.g. '[1, *]'
  #[clap(short, long, default_value = "[]")]
  pub data: String,

  /// Give up after this many seconds instead of blocking forever
  #[clap(short, long)]
  pub timeout: Option<f64>,
}
