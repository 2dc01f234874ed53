// Rebound Infrastructure - System Adapters
// Implements: CommandChannel (ssh), ReachabilityProbe (ping)

pub mod ping_probe;
pub mod ssh_channel;

pub use ping_probe::PingProbe;
pub use ssh_channel::SshCommandChannel;
