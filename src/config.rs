use super::*;

#[derive(Deserialize, Default, PartialEq, Debug)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
  pub(crate) explorer_url: Option<String>,
}

impl Config {
  pub(crate) fn load(path: &Path) -> Result<Self> {
    let file = fs::File::open(path)
      .with_context(|| format!("failed to open config file `{}`", path.display()))?;
    serde_yaml::from_reader(file)
      .with_context(|| format!("failed to deserialize config file `{}`", path.display()))
  }
}
