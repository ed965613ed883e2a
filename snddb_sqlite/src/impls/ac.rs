mod policy;
mod role;
