use std::path::Path;

use anyhow::Result;

use coursepeek::Config;

pub fn cmd_profiles(config_dir: &Path) -> Result<()> {
    let config = Config::load_from(config_dir)?;
    let registry = config.registry();

    for profile in registry.profiles() {
        let hosts = if profile.broad_match {
            "*".to_string()
        } else {
            profile.hosts.join(", ")
        };
        println!("{}", profile.name);
        println!("   hosts:       {hosts}");
        println!("   extensions:  {}", profile.offered_extensions.join(" "));
        if !profile.indirection.is_empty() {
            let rules: Vec<_> = profile.indirection.iter().map(|r| r.name.as_str()).collect();
            println!("   indirection: {}", rules.join(", "));
        }
    }

    Ok(())
}
