mod blue;
mod dispatch;

/// Encodes `args` with the registered module `id` into a default-sized message.
fn encode(id: &str, args: &[&str]) -> Result<Vec<u8>, bluetc_qdisc::QdiscError> {
    let mut builder = bluetc_wire::MessageBuilder::default();
    bluetc_qdisc::registry().lookup(id)?.parse_opt(args, &mut builder)?;
    Ok(builder.as_bytes().to_vec())
}
