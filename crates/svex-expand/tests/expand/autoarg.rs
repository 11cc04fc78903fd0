use crate::common::check;

#[test]
fn expand_empty() {
    check(
        r"
module t1 (  /*AUTOARG*/);
  input logic clk;
  input logic rst;
  output logic o;
endmodule
module t2 (  /*AUTOARG*/);
  input logic clk;
  input rst;
  output reg o;
endmodule
",
        r"
module t1 (  /*AUTOARG*/
    // Inputs
    clk,
    rst,
    // Outputs
    o
);
  input logic clk;
  input logic rst;
  output logic o;
endmodule
module t2 (  /*AUTOARG*/
    // Inputs
    clk,
    rst,
    // Outputs
    o
);
  input logic clk;
  input rst;
  output reg o;
endmodule
",
    );
}

#[test]
fn no_expand_outside_header() {
    check(
        r"
module t ();
  /*AUTOARG*/
  input logic clk;
  input logic rst;
  output logic o;
endmodule
",
        r"
module t ();
  /*AUTOARG*/
  input logic clk;
  input logic rst;
  output logic o;
endmodule
",
    );
}

#[test]
fn replace_stale_list() {
    check(
        r"
module t (  /*AUTOARG*/
    //Inputs
    clk,
    rst
    // some comment
);
  input logic clk;
  input logic rst;
  inout logic io;
  output logic o;
endmodule
",
        r"
module t (  /*AUTOARG*/
    // Inputs
    clk,
    rst,
    // Inouts
    io,
    // Outputs
    o
);
  input logic clk;
  input logic rst;
  inout logic io;
  output logic o;
endmodule
",
    );
}

#[test]
fn skip_predeclared() {
    check(
        r"
module t (
    input i1,
    i2,
    o1,  /*AUTOARG*/
    //Inputs
    clk,
    rst
);
  input logic clk;
  input logic rst;
  input logic i2;
  output logic o1;
  output logic o2;
endmodule
",
        r"
module t (
    input i1,
    i2,
    o1,  /*AUTOARG*/
    // Inputs
    clk,
    rst,
    // Outputs
    o2
);
  input logic clk;
  input logic rst;
  input logic i2;
  output logic o1;
  output logic o2;
endmodule
",
    );
}
