//! # oloo - Objects Linked to Other Objects
//!
//! Delegation-based inheritance without classes:
//! - A small object graph where every object delegates to at most one other object
//! - `link`: splice an extension object into an object's delegate chain, keeping getters and
//!   setters intact and keeping every level a separate object
//! - `link_folded`: the same, with plain methods stored once on a node shared between
//!   instances
//! - `call_base`: call the next implementation of a method up the chain, without knowing how
//!   deep the chain is or where the caller sits in it
//!
//! ## Quick Start
//!
//! ```
//! use oloo::runner::api::Oloo;
//! use oloo::runner::ds::function_object::FunctionObject;
//! use oloo::runner::ds::object_property::PropertyDescriptor;
//! use oloo::runner::ds::value::Value;
//!
//! let ctx = Oloo::new();
//!
//! let animal = ctx.create(None);
//! animal.borrow_mut().define_own_property(
//!     "speak".into(),
//!     PropertyDescriptor::data(Value::Function(FunctionObject::new("speak", |_, _, _| {
//!         Ok(Value::from("..."))
//!     }))),
//! );
//!
//! let dog = ctx.create(None);
//! dog.borrow_mut().define_own_property(
//!     "speak".into(),
//!     PropertyDescriptor::data(Value::Function(FunctionObject::new("speak", |ctx, this, _| {
//!         let base = ctx.call_base(this, "speak", vec![])?;
//!         Ok(Value::from(format!("woof {}", base)))
//!     }))),
//! );
//!
//! let rex = ctx.create(None);
//! ctx.link(&rex, &animal);
//! ctx.link(&rex, &dog);
//!
//! assert_eq!(ctx.invoke(&rex, "speak", vec![]).unwrap(), Value::from("woof ..."));
//! ```
//!
//! ## Base Calls
//!
//! The object graph has no notion of "the method above this one", so a base call works it
//! out at call time:
//!
//! 1. On the first base call for a (receiver, method) pair, the running implementation is the
//!    one an ordinary lookup from the receiver finds. The search starts one level above it.
//!
//! 2. While that call runs, the level it entered is remembered per receiver and method. A
//!    base call made from inside that level continues one level further up.
//!
//! 3. When the outermost base call returns, the remembered state is gone, so a later call
//!    starts again from the top.
//!
//! Running off the end of the chain is an error, never a silent `undefined`:
//!
//! ```
//! use oloo::base;
//! use oloo::runner::api::Oloo;
//! use oloo::runner::ds::error::OlooError;
//!
//! let ctx = Oloo::new();
//! let lonely = ctx.create(None);
//! let err = base!(ctx, &lonely, greet()).unwrap_err();
//! assert!(matches!(err, OlooError::ChainExhausted { .. }));
//! ```
//!
//! ## Architecture
//!
//! - **[`runner::ds`]** - Object graph: nodes, property descriptors, values, functions
//! - **[`runner::chain`]** - Chain construction (`create`, `link`, `link_folded`)
//! - **[`runner::dispatch`]** - Method invocation and base calls
//! - **[`runner::call_state`]** - Bookkeeping for base calls in flight
//! - **[`runner::api`]** - The [`Oloo`](runner::api::Oloo) handle tying it together
//! - **[`runner::config`]**, **[`runner::diagnostics`]** - Configuration and warning sinks

#[macro_use]
extern crate lazy_static;

pub mod runner;
