use std::io;

use bluetc_wire::MessageBuilder;

use crate::QdiscError;

/// The operations a qdisc module exposes to the `tc` front-end.
///
/// Implementations are stateless: every call works only on the buffers it is given.
pub trait QdiscUtil: Send + Sync + 'static {
    /// The identifier the module is selected by, e.g. `"blue_csc573"`.
    fn id(&self) -> &'static str;

    /// Usage synopsis listing every keyword the module advertises.
    fn usage(&self) -> &'static str;

    /// Parses `args` and appends the resulting `TCA_OPTIONS` attribute to `builder`.
    ///
    /// On error nothing is appended.
    fn parse_opt(&self, args: &[&str], builder: &mut MessageBuilder) -> Result<(), QdiscError>;

    /// Renders a received `TCA_OPTIONS` attribute (header included). `None` means the
    /// kernel sent no options and prints nothing.
    fn print_opt(&self, f: &mut dyn io::Write, opt: Option<&[u8]>) -> Result<(), QdiscError>;

    /// Renders a received statistics payload. Modules without extended statistics print
    /// nothing.
    fn print_xstats(
        &self,
        _f: &mut dyn io::Write,
        _xstats: Option<&[u8]>,
    ) -> Result<(), QdiscError> {
        Ok(())
    }
}
