mod decision;
mod flocking;
mod hunger;
mod spawn;
mod steering;
