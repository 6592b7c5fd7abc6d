// ─── Server Manager Core ───
// Provisions and supervises a single local Minecraft server.
//
// Architecture:
//   core/
//     version/    : Mojang manifest + version metadata + URL resolution
//     downloader/ : Streaming artifact download
//     server/     : Managed directory layout, installed-version detection, installer
//     launch/     : Process spawn, output relay, supervisor
//     config/     : eula.txt + server.properties
//     net/        : Public IP lookup
//     state/      : Settings + wired application state

pub mod config;
pub mod downloader;
pub mod error;
pub mod http;
pub mod launch;
pub mod net;
pub mod server;
pub mod state;
pub mod version;
