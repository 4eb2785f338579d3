use uuid::Uuid;

/// A method activation: which method is running and on which receiver.
#[derive(Clone, Debug, PartialEq)]
pub struct ExecutionContext {
    pub method: String,
    pub receiver: Uuid,
}

#[derive(Debug, Default)]
pub struct ExecutionContextStack {
    stack: Vec<ExecutionContext>,
}
impl ExecutionContextStack {
    pub fn new() -> Self {
        ExecutionContextStack { stack: Vec::new() }
    }

    pub fn get_running_execution_ctx(&self) -> Option<&ExecutionContext> {
        self.stack.last()
    }

    pub fn pop_running_execution_ctx(&mut self) -> Option<ExecutionContext> {
        self.stack.pop()
    }

    pub fn push_execution_ctx(&mut self, ctx: ExecutionContext) {
        self.stack.push(ctx)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}
