use rocket::figment::providers::{Env, Format, Serialized, Toml};
use rocket::figment::{Figment, Profile};
use rocket::Config;

// Listen on every interface.
const DEFAULT_ADDRESS: &str = "0.0.0.0";

// Port clients expect the mock light on.
const DEFAULT_PORT: u16 = 8000;

// Configuration file, relative to the working directory.
const CONFIG_FILE: &str = "Rocket.toml";

// Server configuration.
//
// Same layering as Rocket's own figment, with the mock defaults placed right
// above Rocket's defaults so that `Rocket.toml` and `ROCKET_*` variables can
// still override them.
pub(crate) fn figment() -> Figment {
    Figment::from(Config::default())
        .merge(Serialized::default("address", DEFAULT_ADDRESS))
        .merge(Serialized::default("port", DEFAULT_PORT))
        .merge(Toml::file(Env::var_or("ROCKET_CONFIG", CONFIG_FILE)).nested())
        .merge(Env::prefixed("ROCKET_").ignore(&["PROFILE"]).global())
        .select(Profile::from_env_or(
            "ROCKET_PROFILE",
            Config::DEFAULT_PROFILE,
        ))
}
