use canvas_ir::{Op, Result, Sink, Value};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

///Writes every replayed operation down as `name(args)` or `name=value`.
#[derive(Debug, Default)]
pub struct TraceSink {
    pub trace: Vec<String>,
}

impl Sink for TraceSink {
    fn call(&mut self, op: Op, args: &[Value]) -> Result<()> {
	let args = args.iter()
	    .map(Value::to_string)
	    .collect::<Vec<_>>()
	    .join(",");
	self.trace.push(format!("{}({})", op, args));
	Ok(())
    }

    fn set(&mut self, op: Op, value: &Value) -> Result<()> {
	self.trace.push(format!("{}={}", op, value));
	Ok(())
    }
}
