use msrpc_ndr::{PacketOutput, Result, Unmarshallable};

/// An outbound operation paired with the response that decodes its reply
pub trait RequestCall {
    type Response: Unmarshallable;

    /// Operation number, written ahead of the marshalled body
    const OP_NUM: u16;

    /// Marshal the `[in]` parameters in declaration order
    fn marshal(&self, output: &mut PacketOutput) -> Result<()>;

    /// Fresh response object for this request
    ///
    /// Anything the reply cannot describe by itself, such as the information
    /// class selecting a union arm, is handed over here before decoding.
    fn response_object(&self) -> Self::Response;
}
